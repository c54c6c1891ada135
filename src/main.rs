use docquiz_lib::settings::load_settings;

fn print_help() {
    println!("docquiz - PDF term matching, summaries and quizzes over HTTP");
    println!();
    println!("Usage: docquiz [--bind ADDR:PORT] [--reference PATH]");
    println!();
    println!("Environment variables:");
    println!("  DOCQUIZ_BIND             Bind address (default: 127.0.0.1:5000)");
    println!("  DOCQUIZ_REFERENCE_FILE   Reference term file (default: reference_terms.json)");
    println!("  DOCQUIZ_QUIZ_QUESTIONS   Questions per quiz (default: 5)");
    println!("  DOCQUIZ_MAX_UPLOAD_BYTES Request body limit");
    println!("  GEMINI_API_KEY           API key for summaries");
    println!("  GEMINI_MODEL             Model name (default: gemini-1.5-flash)");
    println!("  GEMINI_BASE_URL          API base URL");
    println!("  RUST_LOG                 Log filter (default: info)");
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut settings = load_settings();

    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--bind" if i + 1 < args.len() => {
                settings.bind = Some(args[i + 1].clone());
                i += 2;
            }
            "--reference" if i + 1 < args.len() => {
                settings.reference_file = Some(args[i + 1].clone());
                i += 2;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            other => {
                log::warn!("Ignoring unknown argument: {}", other);
                i += 1;
            }
        }
    }

    if let Err(e) = docquiz_lib::run(settings).await {
        log::error!("{}", e);
        std::process::exit(1);
    }
}
