use booky::web;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let args: Vec<String> = std::env::args().collect();
    let port = args
        .get(1)
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    println!("Starting Booky server on port {}...", port);
    println!("Access the API at http://localhost:{}", port);

    web::start_server(port).await
}
