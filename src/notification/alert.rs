//! Alert content of a push notification.

use serde::Serialize;

/// User-visible alert inside the `aps` dictionary.
///
/// An alert that only carries a [`body`](Alert::body) is serialized as a bare
/// JSON string; once any other field is set it becomes an object with empty
/// fields omitted. A fully empty alert is omitted from the payload entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Alert {
    /// Alert message text.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub body: String,

    /// Short title shown above the body (iOS 8.2+).
    #[serde(skip_serializing_if = "String::is_empty")]
    pub title: String,

    /// Slider/button label override.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub action: String,

    /// Localization key for the body.
    #[serde(rename = "loc-key", skip_serializing_if = "String::is_empty")]
    pub loc_key: String,

    /// Format arguments for `loc-key`, in order.
    #[serde(rename = "loc-args", skip_serializing_if = "Vec::is_empty")]
    pub loc_args: Vec<String>,

    /// Localization key for the action label.
    #[serde(rename = "action-loc-key", skip_serializing_if = "String::is_empty")]
    pub action_loc_key: String,

    /// Launch image filename.
    #[serde(rename = "launch-image", skip_serializing_if = "String::is_empty")]
    pub launch_image: String,
    // Do not add fields without updating is_simple.
}

impl Alert {
    /// A simple alert carries nothing but a body.
    pub(crate) fn is_simple(&self) -> bool {
        self.title.is_empty()
            && self.action.is_empty()
            && self.loc_key.is_empty()
            && self.loc_args.is_empty()
            && self.action_loc_key.is_empty()
            && self.launch_image.is_empty()
    }

    /// An empty alert is omitted from the payload.
    pub(crate) fn is_zero(&self) -> bool {
        self.is_simple() && self.body.is_empty()
    }
}
