use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    helpdesk::run().await
}
