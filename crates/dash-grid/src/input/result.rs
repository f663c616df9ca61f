//! Input result type

use serde::Serialize;
use crate::state::WidgetId;

/// Result of input handling
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum InputResult {
    /// Input was handled by the grid
    Handled,
    /// Input was not handled (pass through)
    Unhandled,
    /// Input should be forwarded to widget content
    Forward {
        #[serde(rename = "widgetId")]
        widget_id: WidgetId,
        /// X coordinate in container-local space
        #[serde(rename = "localX")]
        local_x: f32,
        /// Y coordinate in container-local space
        #[serde(rename = "localY")]
        local_y: f32,
    },
}

impl InputResult {
    #[inline]
    pub fn is_handled(&self) -> bool {
        matches!(self, InputResult::Handled | InputResult::Forward { .. })
    }

    #[inline]
    pub fn is_forward(&self) -> bool {
        matches!(self, InputResult::Forward { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_forward_json_shape() {
        let result = InputResult::Forward {
            widget_id: "notes-1".into(),
            local_x: 12.0,
            local_y: 40.0,
        };
        assert!(result.is_handled());
        assert_eq!(
            serde_json::to_value(&result).unwrap(),
            json!({"type": "forward", "widgetId": "notes-1", "localX": 12.0, "localY": 40.0})
        );
        assert_eq!(serde_json::to_value(InputResult::Unhandled).unwrap(), json!({"type": "unhandled"}));
    }
}
