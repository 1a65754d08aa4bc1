use anyhow::Result;

use crate::render::render_table;
use crate::{load_config, open_session};

pub(crate) async fn run(password: Option<String>, json: bool) -> Result<()> {
    let config = load_config()?;
    let session = open_session(&config, password).await?;

    if let Some(err) = &session.state().last_error {
        anyhow::bail!("{err}");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(session.patterns())?);
    } else {
        print!("{}", render_table(session.patterns(), &config.viewer_base_url));
    }
    Ok(())
}
