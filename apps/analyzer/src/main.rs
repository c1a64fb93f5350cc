use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use resume_analyzer::analysis::Analyzer;
use resume_analyzer::config::Config;
use resume_analyzer::llm_client::LlmClient;
use resume_analyzer::preprocess::Preprocessor;
use resume_analyzer::recommendation::Recommender;
use resume_analyzer::routes::build_router;
use resume_analyzer::similarity::{EmbeddingSimilarity, TextSimilarity, TfIdfSimilarity};
use resume_analyzer::skill::{
    Lemmatizer, LookupLemmatizer, NlpruleLemmatizer, Normalizer, SkillDynamicMatcher,
    SkillListMatcher,
};
use resume_analyzer::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={},tower_http={}",
                env!("CARGO_CRATE_NAME"),
                &config.rust_log,
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume analyzer v{}", env!("CARGO_PKG_VERSION"));

    // Override table: configured file or the embedded English table
    let overrides = match &config.lemma_table_path {
        Some(path) => LookupLemmatizer::load(path)?,
        None => LookupLemmatizer::english()?,
    };
    // A missing or unreadable tokenizer binary is fatal
    let lemmatizer: Arc<dyn Lemmatizer> = Arc::new(
        NlpruleLemmatizer::load(&config.nlprule_tokenizer_path, overrides).with_context(|| {
            format!(
                "loading nlprule tokenizer {}",
                config.nlprule_tokenizer_path.display()
            )
        })?,
    );

    let list_matcher = SkillListMatcher::with_threshold(
        Normalizer::new(Arc::clone(&lemmatizer)),
        config.fuzzy_threshold,
    )?;

    // A missing or unreadable skill model is fatal
    let dynamic_matcher = SkillDynamicMatcher::load(&config.skill_model_path)
        .with_context(|| format!("loading skill model {}", config.skill_model_path.display()))?;
    info!("Skill model loaded from {}", config.skill_model_path.display());

    let preprocessor = Preprocessor::new(Arc::clone(&lemmatizer));

    let similarity: Arc<dyn TextSimilarity> = match &config.embedding_api_url {
        Some(url) => Arc::new(EmbeddingSimilarity::new(
            url.clone(),
            config.embedding_api_key.clone(),
            config.embedding_model.clone(),
        )?),
        None => Arc::new(TfIdfSimilarity),
    };
    info!("Similarity backend: {}", similarity.backend());

    let recommender = match &config.anthropic_api_key {
        Some(key) => {
            let llm = LlmClient::new(key.clone(), config.llm_model.clone())?;
            info!("LLM client initialized (model: {})", llm.model());
            Some(Recommender::new(llm))
        }
        None => {
            warn!("ANTHROPIC_API_KEY not set; AI recommendations disabled");
            None
        }
    };

    let analyzer = Analyzer::new(
        list_matcher,
        dynamic_matcher,
        preprocessor,
        similarity,
        recommender,
    );

    let state = AppState {
        analyzer: Arc::new(analyzer),
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict allowed origins once a frontend origin is fixed

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
