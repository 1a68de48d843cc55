use anyhow::Context;
use recall_config::RecallConfig;
use recall_source::{UserData, WaniKaniApi};

use crate::cli::GlobalFlags;
use crate::output::{TextView, output};

impl TextView for UserData {
    fn to_text(&self) -> String {
        match self.level {
            Some(level) => format!("{} (level {level})", self.username),
            None => self.username.clone(),
        }
    }
}

/// Handle `recall whoami`.
pub async fn handle(config: &RecallConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let client = super::wanikani_client(config)?;
    let user = client
        .user()
        .await
        .context("failed to fetch the WaniKani user")?;
    output(&user, flags.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_includes_level_when_known() {
        let user = UserData {
            username: "koichi".into(),
            level: Some(12),
        };
        assert_eq!(user.to_text(), "koichi (level 12)");

        let user = UserData {
            username: "koichi".into(),
            level: None,
        };
        assert_eq!(user.to_text(), "koichi");
    }
}
