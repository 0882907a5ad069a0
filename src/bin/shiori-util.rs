use clap::Parser;

fn main() {
    use shiori::util::cli::*;

    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let opts = Options::parse();
    match run_cli_action(opts) {
        Ok(output) => println!("{}", output),
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    }
}
