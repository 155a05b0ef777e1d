#[tokio::main]
async fn main() -> anyhow::Result<()> {
    message_files::run().await
}
