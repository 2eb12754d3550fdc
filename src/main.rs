#[tokio::main]
async fn main() {
    if let Err(e) = app_lib::run().await {
        log::error!("{}", e);
        eprintln!("atlas: {e}");
        std::process::exit(1);
    }
}
