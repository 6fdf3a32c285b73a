// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Arukas Control CLI
//!
//! CLI tool for managing Arukas apps and services.
//!
//! Usage:
//!   arukas-ctl <command> [options]
//!
//! Commands:
//!   list-apps
//!   create-app --name <name> --image <image> --port <n[/proto]> --plan <plan>
//!   read-app <app_id>
//!   delete-app <app_id>
//!   list-services
//!   read-service <service_id>
//!   update-service <service_id> --image <image>
//!   power-on <service_id> [--wait]
//!   power-off <service_id> [--wait]
//!   wait <service_id> --status <status>

use std::io;
use std::process::ExitCode;
use std::time::Duration;

use arukas_sdk::{
    ArukasClient, CancellationToken, ClientParam, Port, RequestParam, SdkError, ServiceStatus,
};
use serde::Serialize;

const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 300;

fn print_usage() {
    eprintln!(
        r#"Usage: arukas-ctl <command> [options]

Manage Arukas apps and services.

COMMANDS:
    list-apps                       List apps
    create-app                      Create an app and its service
    read-app <app_id>               Get app details
    delete-app <app_id>             Delete an app
    list-services                   List services
    read-service <service_id>       Get service details
    update-service <service_id>     Update a service
    power-on <service_id>           Start a service
    power-off <service_id>          Stop a service
    wait <service_id>               Wait for a service status

CREATE / UPDATE OPTIONS:
    --name <name>                   App name (create only, required)
    --image <image>                 Container image (required)
    --instances <n>                 Instance count (default: 1)
    --port <n[/tcp|udp]>            Exposed port, repeatable (create: at least one)
    --env <KEY=VALUE>               Environment variable, repeatable
    --command <cmd>                 Start command override
    --plan <plan>                   free, hobby, standard-1, standard-2 (create: required)
    --region <region>               Region (default: jp-tokyo)
    --subdomain <name>              Subdomain under arukas.io

POWER OPTIONS:
    --wait                          Wait until running / stopped
    --timeout <seconds>             Wait timeout (default: 300)

WAIT OPTIONS:
    --status <status>               Target status (required)
    --timeout <seconds>             Wait timeout (default: 300)

ENVIRONMENT:
    ARUKAS_JSON_API_TOKEN           API token (required)
    ARUKAS_JSON_API_SECRET          API secret (required)
    ARUKAS_JSON_API_URL             API base URL (default: https://app.arukas.io/api/)
    ARUKAS_DEBUG                    Trace HTTP traffic to stderr
    RUST_LOG                        Log filter (default: warn)

EXAMPLES:
    # Create an nginx app on the free plan
    arukas-ctl create-app --name web --image nginx:latest --port 80 --plan free

    # Start it and wait until it is running
    arukas-ctl power-on 01BEF829-72E4-48F9-81DA-E3B41A1EDAC9 --wait --timeout 120
"#
    );
}

#[derive(Debug, PartialEq)]
enum Command {
    Help,
    ListApps,
    CreateApp {
        param: RequestParam,
    },
    ReadApp {
        app_id: String,
    },
    DeleteApp {
        app_id: String,
    },
    ListServices,
    ReadService {
        service_id: String,
    },
    UpdateService {
        service_id: String,
        param: RequestParam,
    },
    PowerOn {
        service_id: String,
        wait: bool,
        timeout_secs: u64,
    },
    PowerOff {
        service_id: String,
        wait: bool,
        timeout_secs: u64,
    },
    Wait {
        service_id: String,
        status: ServiceStatus,
        timeout_secs: u64,
    },
}

fn parse_args() -> Result<Command, String> {
    let args: Vec<String> = std::env::args().collect();
    parse_args_from_vec(&args)
}

fn parse_args_from_vec(args: &[String]) -> Result<Command, String> {
    if args.len() < 2 {
        return Err("No command specified".to_string());
    }

    match args[1].as_str() {
        "help" | "--help" | "-h" => Ok(Command::Help),
        "list-apps" => {
            no_extra_args(args, 2)?;
            Ok(Command::ListApps)
        }
        "create-app" => {
            let param = parse_request_param(args, 2, true)?;
            Ok(Command::CreateApp { param })
        }
        "read-app" => {
            let app_id = args.get(2).ok_or("App ID required")?.clone();
            no_extra_args(args, 3)?;
            Ok(Command::ReadApp { app_id })
        }
        "delete-app" => {
            let app_id = args.get(2).ok_or("App ID required")?.clone();
            no_extra_args(args, 3)?;
            Ok(Command::DeleteApp { app_id })
        }
        "list-services" => {
            no_extra_args(args, 2)?;
            Ok(Command::ListServices)
        }
        "read-service" => {
            let service_id = args.get(2).ok_or("Service ID required")?.clone();
            no_extra_args(args, 3)?;
            Ok(Command::ReadService { service_id })
        }
        "update-service" => {
            let service_id = args.get(2).ok_or("Service ID required")?.clone();
            let param = parse_request_param(args, 3, false)?;
            Ok(Command::UpdateService { service_id, param })
        }
        cmd @ ("power-on" | "power-off") => {
            let service_id = args.get(2).ok_or("Service ID required")?.clone();
            let mut wait = false;
            let mut timeout_secs = DEFAULT_WAIT_TIMEOUT_SECS;

            let mut i = 3;
            while i < args.len() {
                match args[i].as_str() {
                    "--wait" => wait = true,
                    "--timeout" => {
                        i += 1;
                        timeout_secs = parse_timeout(args.get(i))?;
                    }
                    arg => return Err(format!("Unknown argument: {}", arg)),
                }
                i += 1;
            }

            if cmd == "power-on" {
                Ok(Command::PowerOn {
                    service_id,
                    wait,
                    timeout_secs,
                })
            } else {
                Ok(Command::PowerOff {
                    service_id,
                    wait,
                    timeout_secs,
                })
            }
        }
        "wait" => {
            let service_id = args.get(2).ok_or("Service ID required")?.clone();
            let mut status: Option<ServiceStatus> = None;
            let mut timeout_secs = DEFAULT_WAIT_TIMEOUT_SECS;

            let mut i = 3;
            while i < args.len() {
                match args[i].as_str() {
                    "--status" => {
                        i += 1;
                        status = Some(parse_status(args.get(i))?);
                    }
                    "--timeout" => {
                        i += 1;
                        timeout_secs = parse_timeout(args.get(i))?;
                    }
                    arg => return Err(format!("Unknown argument: {}", arg)),
                }
                i += 1;
            }

            Ok(Command::Wait {
                service_id,
                status: status.ok_or("--status is required")?,
                timeout_secs,
            })
        }
        cmd => Err(format!("Unknown command: {}", cmd)),
    }
}

/// Parse the shared create/update options starting at `args[start]`.
fn parse_request_param(
    args: &[String],
    start: usize,
    create: bool,
) -> Result<RequestParam, String> {
    let mut name: Option<String> = None;
    let mut image: Option<String> = None;
    let mut param = RequestParam {
        instances: 1,
        ..RequestParam::default()
    };

    let mut i = start;
    while i < args.len() {
        match args[i].as_str() {
            "--name" if create => {
                i += 1;
                name = Some(args.get(i).ok_or("--name requires a value")?.clone());
            }
            "--image" => {
                i += 1;
                image = Some(args.get(i).ok_or("--image requires a value")?.clone());
            }
            "--instances" => {
                i += 1;
                param.instances = args
                    .get(i)
                    .ok_or("--instances requires a number")?
                    .parse()
                    .map_err(|_| "Invalid instance count")?;
            }
            "--port" => {
                i += 1;
                let raw = args.get(i).ok_or("--port requires a value")?;
                let port: Port = raw
                    .parse()
                    .map_err(|e| format!("Invalid port {}: {}", raw, e))?;
                param = param.with_port(port);
            }
            "--env" => {
                i += 1;
                let raw = args.get(i).ok_or("--env requires KEY=VALUE")?;
                let (key, value) = raw
                    .split_once('=')
                    .ok_or_else(|| format!("Invalid env {}: expected KEY=VALUE", raw))?;
                param = param.with_env(key, value);
            }
            "--command" => {
                i += 1;
                param = param.with_command(args.get(i).ok_or("--command requires a value")?);
            }
            "--plan" => {
                i += 1;
                param = param.with_plan(args.get(i).ok_or("--plan requires a value")?);
            }
            "--region" => {
                i += 1;
                param = param.with_region(args.get(i).ok_or("--region requires a value")?);
            }
            "--subdomain" => {
                i += 1;
                param = param.with_sub_domain(args.get(i).ok_or("--subdomain requires a value")?);
            }
            arg => return Err(format!("Unknown argument: {}", arg)),
        }
        i += 1;
    }

    if create {
        param.name = name.ok_or("--name is required")?;
    }
    param.image = image.ok_or("--image is required")?;
    Ok(param)
}

fn parse_timeout(value: Option<&String>) -> Result<u64, String> {
    value
        .ok_or("--timeout requires a number")?
        .parse()
        .map_err(|_| "Invalid timeout".to_string())
}

fn parse_status(value: Option<&String>) -> Result<ServiceStatus, String> {
    let name = value.ok_or("--status requires a value")?;
    match ServiceStatus::from_name(name) {
        ServiceStatus::Unknown => Err(format!("Unknown status: {}", name)),
        status => Ok(status),
    }
}

fn no_extra_args(args: &[String], from: usize) -> Result<(), String> {
    match args.get(from) {
        Some(arg) => Err(format!("Unknown argument: {}", arg)),
        None => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(io::stderr)
        .init();

    let cmd = match parse_args() {
        Ok(Command::Help) => {
            print_usage();
            return ExitCode::SUCCESS;
        }
        Ok(cmd) => cmd,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let param = match ClientParam::from_env() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let client = match ArukasClient::new(param) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to create client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    match execute_command(&client, cmd, &cancel).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<(), String> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).map_err(|e| e.to_string())?
    );
    Ok(())
}

async fn wait_for(
    client: &ArukasClient,
    service_id: &str,
    status: ServiceStatus,
    cancel: &CancellationToken,
    timeout_secs: u64,
) -> Result<(), String> {
    client
        .wait_for_state_until(
            service_id,
            status,
            cancel,
            Duration::from_secs(timeout_secs),
        )
        .await
        .map_err(|e| match e {
            SdkError::DeadlineExceeded(_) => {
                format!(
                    "{} did not reach {} within {}s",
                    service_id, status, timeout_secs
                )
            }
            e => e.to_string(),
        })
}

async fn execute_command(
    client: &ArukasClient,
    cmd: Command,
    cancel: &CancellationToken,
) -> Result<(), String> {
    match cmd {
        Command::Help => print_usage(),

        Command::ListApps => {
            let apps = client.list_apps().await.map_err(|e| e.to_string())?;
            print_json(&apps)?;
        }

        Command::CreateApp { param } => {
            let app = client.create_app(&param).await.map_err(|e| e.to_string())?;
            print_json(&app)?;
        }

        Command::ReadApp { app_id } => {
            let app = client.read_app(&app_id).await.map_err(|e| e.to_string())?;
            print_json(&app)?;
        }

        Command::DeleteApp { app_id } => {
            client.delete_app(&app_id).await.map_err(|e| e.to_string())?;
            println!("Deleted: {}", app_id);
        }

        Command::ListServices => {
            let services = client.list_services().await.map_err(|e| e.to_string())?;
            print_json(&services)?;
        }

        Command::ReadService { service_id } => {
            let service = client
                .read_service(&service_id)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&service)?;
        }

        Command::UpdateService { service_id, param } => {
            let service = client
                .update_service(&service_id, &param)
                .await
                .map_err(|e| e.to_string())?;
            print_json(&service)?;
        }

        Command::PowerOn {
            service_id,
            wait,
            timeout_secs,
        } => {
            client
                .power_on(&service_id)
                .await
                .map_err(|e| e.to_string())?;
            if wait {
                wait_for(
                    client,
                    &service_id,
                    ServiceStatus::Running,
                    cancel,
                    timeout_secs,
                )
                .await?;
                println!("Running: {}", service_id);
            } else {
                println!("Powering on: {}", service_id);
            }
        }

        Command::PowerOff {
            service_id,
            wait,
            timeout_secs,
        } => {
            client
                .power_off(&service_id)
                .await
                .map_err(|e| e.to_string())?;
            if wait {
                wait_for(
                    client,
                    &service_id,
                    ServiceStatus::Stopped,
                    cancel,
                    timeout_secs,
                )
                .await?;
                println!("Stopped: {}", service_id);
            } else {
                println!("Powering off: {}", service_id);
            }
        }

        Command::Wait {
            service_id,
            status,
            timeout_secs,
        } => {
            wait_for(client, &service_id, status, cancel, timeout_secs).await?;
            println!("{}: {}", status, service_id);
        }
    }

    Ok(())
}
