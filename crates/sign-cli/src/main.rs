use clap::Parser;
use log::info;
use serde::Serialize;
use sign_core::{EndpointCategory, HeaderAssembler, HeaderBag, OutboundRequest, SessionContext, SignError, SignerConfig,
                StaticLookups};
use sign_hooks::{EchoTransport, HookError, Interceptor, RequestEvent, TransportResponse};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

#[derive(Parser, Debug)]
#[command(name = "signflow", about = "Firma requests salientes y clasifica endpoints")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(clap::Subcommand, Debug)]
enum Command {
    /// Firma un request (JSON) y muestra la bolsa de headers.
    Sign {
        #[arg(long)]
        request: PathBuf,
        #[arg(long)]
        lookups: PathBuf,
        /// Id de la sesión autenticada.
        #[arg(long)]
        session: String,
        /// Etiqueta explícita del endpoint (si no, se clasifica por URL).
        #[arg(long)]
        endpoint: Option<String>,
        /// Pasa el request por el pipeline completo con `EchoTransport`.
        #[arg(long, default_value_t = false)]
        send: bool,
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Muestra la categoría de una URL.
    Classify { url: String },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{path}: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("invalid request json: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Sign(#[from] SignError),
    #[error(transparent)]
    Hook(#[from] HookError),
}

#[derive(Serialize)]
struct SendReport {
    response: TransportResponse,
    events: Vec<RequestEvent>,
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    match run(cli).await {
        Ok(out) => println!("{out}"),
        Err(err) => {
            eprintln!("signflow error: {err}");
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<String, CliError> {
    match cli.command {
        Command::Classify { url } => Ok(EndpointCategory::classify(&url).to_string()),
        Command::Sign { request,
                        lookups,
                        session,
                        endpoint,
                        send,
                        timeout_ms, } => {
            let mut config = SignerConfig::from_env()?;
            if let Some(ms) = timeout_ms {
                if ms == 0 {
                    return Err(SignError::Config("--timeout-ms must be positive".into()).into());
                }
                config = config.with_timeout(Duration::from_millis(ms));
            }
            let mut outbound: OutboundRequest = serde_json::from_str(&read(&request)?)?;
            if let Some(label) = endpoint {
                outbound = outbound.with_endpoint(label);
            }
            let lookups = StaticLookups::from_json_str(&read(&lookups)?)?;
            let session = SessionContext::resolve(Some(&session), &lookups)?;
            let assembler = HeaderAssembler::from_lookups(&config, Arc::new(lookups));

            if send {
                let report = send_through_pipeline(&config, assembler, outbound, &session).await?;
                Ok(serde_json::to_string_pretty(&report)?)
            } else {
                let headers = sign_only(&assembler, &outbound, &session)?;
                Ok(serde_json::to_string_pretty(&headers)?)
            }
        }
    }
}

fn read(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read { path: path.display().to_string(),
                                                                    source })
}

fn sign_only(assembler: &HeaderAssembler,
             request: &OutboundRequest,
             session: &SessionContext)
             -> Result<HeaderBag, SignError> {
    let category = request.category();
    info!("signing {} as {}", request.url, category);
    assembler.assemble(request, session, category)
}

async fn send_through_pipeline(config: &SignerConfig,
                               assembler: HeaderAssembler,
                               request: OutboundRequest,
                               session: &SessionContext)
                               -> Result<SendReport, CliError> {
    let interceptor = Interceptor::from_config(config, assembler, Arc::new(EchoTransport));
    let handle = interceptor.prepare(request, session)?;
    let id = handle.id();
    let response = interceptor.dispatch(handle).await?;
    Ok(SendReport { response,
                    events: interceptor.events().list(id) })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;
    use sign_core::constants::HEADER_APPLICATION;
    use sign_core::HttpMethod;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_sign_flags() {
        let cli = Cli::try_parse_from(["signflow", "sign", "--request", "r.json", "--lookups", "l.json", "--session",
                                       "uid", "--send", "--timeout-ms", "500"]).unwrap();
        match cli.command {
            Command::Sign { session,
                            send,
                            timeout_ms,
                            endpoint,
                            .. } => {
                assert_eq!(session, "uid");
                assert!(send);
                assert_eq!(timeout_ms, Some(500));
                assert!(endpoint.is_none());
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[tokio::test]
    async fn classify_prints_category() {
        let cli = Cli::try_parse_from(["signflow", "classify", "https://mockapi.com/otp/verify?x=1"]).unwrap();
        assert_eq!(run(cli).await.unwrap(), "verify");
    }

    fn fixture() -> (HeaderAssembler, SessionContext, OutboundRequest, SignerConfig) {
        let lookups = StaticLookups::from_json_str(r#"{"channel": {"channelRefNo": "CH-1"}}"#).unwrap();
        let session = SessionContext::resolve(Some("uid-1"), &lookups).unwrap();
        let config = SignerConfig::new("secret");
        let assembler = HeaderAssembler::from_lookups(&config, Arc::new(lookups));
        let request = OutboundRequest::new(HttpMethod::Post, "https://mockapi.com/apply").with_payload(json!({"application": {"a": 1}}));
        (assembler, session, request, config)
    }

    #[test]
    fn sign_only_returns_headers() {
        let (assembler, session, request, _) = fixture();
        let headers = sign_only(&assembler, &request, &session).unwrap();
        assert!(headers.contains(HEADER_APPLICATION));
    }

    #[tokio::test]
    async fn send_reports_events() {
        let (assembler, session, request, config) = fixture();
        let report = send_through_pipeline(&config, assembler, request, &session).await.unwrap();
        assert_eq!(report.response.status, 200);
        assert!(report.response.body.get(HEADER_APPLICATION).is_some());
        assert_eq!(report.events.len(), 4);
    }
}
