use anyhow::Result;
use clap::Parser;
use ragcore_server::ServerConfig;
use std::net::SocketAddr;

#[derive(Parser, Debug)]
#[command(name = "ragcore-server", version, about = "Origin-tagged RAG service")]
struct Args {
    /// Address to listen on.
    #[arg(long)]
    bind: Option<SocketAddr>,

    /// Base URL of the chat-completion backend.
    #[arg(long)]
    llm_base_url: Option<String>,

    /// Model used for knowledge-base construction.
    #[arg(long)]
    model: Option<String>,

    /// Model used for user queries (defaults to --model).
    #[arg(long)]
    query_model: Option<String>,

    #[arg(long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if args.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let mut config = ServerConfig::from_env()?;
    if let Some(bind) = args.bind {
        config.bind_addr = bind;
    }
    if let Some(base_url) = args.llm_base_url {
        config.llm_base_url = base_url;
    }
    if let Some(model) = args.model {
        config.query_model = args.query_model.clone().unwrap_or_else(|| model.clone());
        config.build_model = model;
    } else if let Some(query_model) = args.query_model {
        config.query_model = query_model;
    }

    ragcore_server::serve(config).await
}
