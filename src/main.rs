use log::{info, warn};
use serde_json::json;
use signflow_rust::interceptor_with_config;
use signflow_rust::sign_core::{ChannelReference, HttpMethod, OutboundRequest, ProductDescriptor, SessionContext,
                               SignerConfig, StaticLookups};
use signflow_rust::sign_hooks::{EchoTransport, RequestEventKind};
use std::sync::Arc;

/// Recorrido de demostración: firma y "envía" (eco) un request por categoría.
#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match SignerConfig::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            warn!("{e}; usando secreto de demostración");
            SignerConfig::new("demo-xrtob")
        }
    };

    let lookups = StaticLookups::new().with_channel(ChannelReference::new("CH-DEMO").with_application_ref("APP-DEMO")
                                                                                   .with_code("C1"))
                                      .with_product(ProductDescriptor::default().with_field("product_description", json!("Savings"))
                                                                                .with_field("company_category", json!("RB"))
                                                                                .with_field("product_category_name", json!(["CA"])))
                                      .with_key_token("tokenKeys", "demo-token")
                                      .with_query_param("isMyInfoVirtualNRIC", "false");
    let session = match SessionContext::resolve(Some("demo-session"), &lookups) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("[signflow-demo] {e}");
            std::process::exit(2);
        }
    };
    let interceptor = interceptor_with_config(&config, Arc::new(lookups), Arc::new(EchoTransport));

    let payload = json!({
        "application": { "stage": { "page_id": "ad-1", "stage_id": "bd-1" } },
        "applicants": { "name": "Ann" },
        "mobileNo": "91234567",
        "flowType": "ETC"
    });
    let paths = ["/resume", "/customer", "/otp/generate", "/otp/verify", "/authorize", "/apply"];
    for path in paths {
        let request = OutboundRequest::new(HttpMethod::Post, format!("https://api.demo{path}")).with_payload(payload.clone());
        let handle = match interceptor.prepare(request, &session) {
            Ok(h) => h,
            Err(e) => {
                eprintln!("[signflow-demo] {path}: {e}");
                continue;
            }
        };
        let id = handle.id();
        let category = handle.category();
        let names: Vec<String> = handle.request().headers.names().map(str::to_string).collect();
        match interceptor.dispatch(handle).await {
            Ok(resp) => info!("{path} -> {category} status={} headers={names:?}", resp.status),
            Err(e) => warn!("{path} -> {category} failed: {e}"),
        }
        let cleared = interceptor.events()
                                 .list(id)
                                 .iter()
                                 .filter(|ev| ev.kind == RequestEventKind::TimerCleared)
                                 .count();
        println!("{path}: category={category} timer_cleared={cleared}");
    }
}
