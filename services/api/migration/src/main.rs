#[tokio::main]
async fn main() {
    sea_orm_migration::cli::run_cli(ladle_api_migration::Migrator).await;
}
