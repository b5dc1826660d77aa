//! Media server browsing that outputs JSON for scripting
//!
//! Usage: cargo run -p dlna-sdk --example dlna_json -- [--verbose|--debug] <cmd> [args]
//!
//!   discover                         descriptor URLs of every media server
//!   info [desc_url]                  descriptions of all (or one) servers
//!   content <control_url> [id]       children of object `id` (default "0")
//!   meta <control_url> <id>          metadata of object `id`
//!   get|post <url> [id] [flag]       raw Browse call, result left unflattened

use dlna_client::logging::{init_logging, LoggingMode};
use dlna_client::{BrowseFlag, HttpMethod, MediaServerClient};
use serde::Serialize;

fn main() {
    let mut mode = LoggingMode::Silent;
    let mut args = Vec::new();
    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "--verbose" => mode = LoggingMode::Development,
            "--debug" => mode = LoggingMode::Debug,
            _ => args.push(arg),
        }
    }

    if let Err(e) = init_logging(mode) {
        eprintln!("{}", e);
    }

    let client = MediaServerClient::new();
    let arg = |index: usize| args.get(index).map(String::as_str);

    let outcome = match (arg(0), arg(1)) {
        (Some("discover"), _) => print(client.discover_devices()),
        (Some("info"), desc_url) => print(client.fetch_device_info(desc_url)),
        (Some("content"), Some(url)) => print(client.browse_content(url, arg(2).unwrap_or("0"), 0, 0)),
        (Some("meta"), Some(url)) => match arg(2) {
            Some(id) => print(client.fetch_metadata(url, id)),
            None => usage(),
        },
        (Some(method @ ("get" | "post")), Some(url)) => {
            let method: HttpMethod = method.parse().unwrap_or(HttpMethod::Post);
            let flag: BrowseFlag = arg(3)
                .and_then(|flag| flag.parse().ok())
                .unwrap_or_default();
            print(client.raw_request(method, url, arg(2).unwrap_or("0"), flag, 0, 0))
        }
        _ => usage(),
    };

    std::process::exit(outcome);
}

fn print<T: Serialize>(result: dlna_client::Result<T>) -> i32 {
    match result {
        Ok(value) => {
            println!("{}", serde_json::to_string_pretty(&value).unwrap());
            0
        }
        Err(e) => {
            let error = serde_json::json!({ "status": e.status(), "error": e.to_string() });
            println!("{}", serde_json::to_string_pretty(&error).unwrap());
            1
        }
    }
}

fn usage() -> i32 {
    eprintln!("usage: dlna_json [--verbose|--debug] <discover | info [desc_url] | content <control_url> [id] | meta <control_url> <id> | get|post <url> [id] [flag]>");
    2
}
