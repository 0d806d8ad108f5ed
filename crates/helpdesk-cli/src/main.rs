#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    helpdesk_cli::run().await
}
