use strum::{AsRefStr, Display};

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Message,
}

#[derive(Display, Clone, Copy, Debug, PartialEq, Eq, AsRefStr)]
pub enum SinkKind {
    #[strum(serialize = "Spreadsheet webhook")]
    Webhook,
    #[strum(serialize = "Email API")]
    Notification,
}

#[derive(Display, AsRefStr, Default, Clone, Copy, Debug, PartialEq, Eq)]
#[strum(serialize_all = "lowercase")]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}
