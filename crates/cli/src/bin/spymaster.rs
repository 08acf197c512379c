use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    spymaster_cli::main_entry().await
}
