use anyhow::Result;
use patterning_service::{Confirmation, ServiceError};

use crate::{load_config, open_session, prompt_line};

pub(crate) async fn run(id: String, password: Option<String>, yes: bool) -> Result<()> {
    let config = load_config()?;
    let mut session = open_session(&config, password).await?;

    if !session.state().contains(&id) {
        tracing::warn!(id = %id, "voicing is not among the recent patterns, deleting anyway");
    }

    let confirmation = if yes {
        Confirmation::Confirmed
    } else {
        let answer = prompt_line(&format!(
            "Delete voicing {id}? This cannot be undone. [y/N] "
        ))?;
        Confirmation::from(matches!(answer.trim(), "y" | "Y" | "yes"))
    };

    match session.delete(&id, confirmation).await {
        Ok(()) => {
            println!("Deleted {id}");
            Ok(())
        },
        Err(ServiceError::ConfirmationRequired) => {
            println!("Cancelled");
            Ok(())
        },
        Err(e) => Err(e.into()),
    }
}
