use folio_api::{endpoints::ProjectStatus, Client, FolioApiError, Request};
use secrecy::SecretString;

#[tokio::main]
pub async fn main() -> Result<(), FolioApiError> {
    let token = SecretString::from("access_token".to_string());
    let client = Client::new("http://localhost:8080", &token);

    let projects = client.send(Request::projects().list()).await?;

    if let Some(project) = projects.first() {
        let req = Request::projects()
            .update(project.id)
            .status(ProjectStatus::InProgress);
        let _updated = client.send(req).await?;
    }
    Ok(())
}
