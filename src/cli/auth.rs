use crate::{Result, config::Config, mal::StdinCodeProvider};

use super::token_manager;

pub async fn auth(config: &Config, open_browser: bool) -> Result<()> {
    let mut provider = StdinCodeProvider { open_browser };
    token_manager(config).authorize(&mut provider).await?;
    Ok(())
}
