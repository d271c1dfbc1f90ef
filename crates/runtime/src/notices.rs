use tracing::warn;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// Message meant for the person using the viewer, not for logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct NoticeBoard {
    notices: Vec<Notice>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self {
            notices: Vec::new(),
        }
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.notices.push(Notice {
            level: NoticeLevel::Info,
            message: message.into(),
        });
    }

    pub fn error(&mut self, message: impl Into<String>) {
        let message = message.into();
        warn!(%message, "user-visible error");
        self.notices.push(Notice {
            level: NoticeLevel::Error,
            message,
        });
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn errors(&self) -> impl Iterator<Item = &Notice> {
        self.notices.iter().filter(|n| n.level == NoticeLevel::Error)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    pub fn drain(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
