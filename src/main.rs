#[tokio::main]
async fn main() {
    if let Err(e) = guestlist_backend::run().await {
        eprintln!("guestlist service stopped: {}", e);
        std::process::exit(1);
    }
}
