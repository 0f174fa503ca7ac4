use std::net::SocketAddr;
use std::sync::Arc;
use tenken_core::error::TenkenError;
use tenken_core::extraction::pdftotext::PdftotextExtractor;

use super::AnalyzerArgs;
use crate::server::{self, AppState};

pub fn run(addr: SocketAddr, analyzer_args: AnalyzerArgs) -> Result<(), TenkenError> {
    // Load the lexicon up front so a bad file fails before the port is bound.
    let lexicon = analyzer_args.lexicon()?;
    let config = analyzer_args.config();

    if !PdftotextExtractor::is_available() {
        tracing::warn!("pdftotext not found; uploaded PDFs will be reported as unreadable");
    }

    let state = AppState {
        config: Arc::new(config),
        lexicon: Arc::new(lexicon),
        extractor: Arc::new(PdftotextExtractor::new()),
    };

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(server::serve(addr, state))
}
