use anyhow::Result;
use std::sync::Arc;

use folio::log_buffer::LogBuffer;
use folio::logging::init_logging_with_buffer;
use folio::state::ExitReason;
use folio::App;

#[tokio::main]
async fn main() -> Result<()> {
    let log_buffer = LogBuffer::new(5000);
    let log_path = init_logging_with_buffer(log_buffer.clone())?;
    tracing::info!(log_path = %log_path.display(), "folio starting");

    loop {
        let session = Arc::new(folio_auth::authenticate().await?);

        match App::new(session).run(&log_buffer).await? {
            ExitReason::SessionExpired => {
                println!("Your session has expired. Please log in again.");
            }
            ExitReason::LoggedOut => {
                println!("Logged out.");
                break;
            }
            ExitReason::Quit => break,
        }
    }

    Ok(())
}
