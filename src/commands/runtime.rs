use crate::*;
use chrono::Local;

pub fn handle_command(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config()?;
    let api_url = cli
        .api
        .clone()
        .or(config.api_url.clone())
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    let timeout_secs = cli
        .timeout
        .or(config.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    let api = ApiClient::new(&api_url, timeout_secs);
    let mut state = load_state()?;

    match &cli.command {
        Commands::Status => {
            let health = api.health();
            print_one(cli.json, health, |h| {
                if h.online {
                    match &h.engine {
                        Some(engine) => format!("online ({})", engine),
                        None => "online".to_string(),
                    }
                } else {
                    "offline".to_string()
                }
            })?;
        }
        Commands::Stage { file, content_type } => {
            let staged = staging::select(file, content_type.as_deref())?;
            let label = format_file_size(staged.size);
            state.staged = Some(staged.clone());
            save_state(&state)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: staged
                    })?
                );
            } else {
                println!("staged {} ({})", staged.name, label);
                println!("sha256: {}", staged.sha256);
            }
        }
        Commands::Staged => match &state.staged {
            Some(staged) => print_one(cli.json, staged, |s| {
                format!(
                    "{} ({})\ntype: {}\nsha256: {}\nstaged at: {}",
                    s.name,
                    format_file_size(s.size),
                    s.content_type,
                    s.sha256,
                    s.staged_at
                )
            })?,
            None => print_one(cli.json, serde_json::Value::Null, |_| {
                "nothing staged".to_string()
            })?,
        },
        Commands::Unstage => {
            state.staged = None;
            state.last_audit = None;
            save_state(&state)?;
            print_one(cli.json, "unstaged", |_| {
                "staged file removed; results cleared".to_string()
            })?;
        }
        Commands::Audit => {
            let staged = state.staged.clone().ok_or(StateError::NoStagedFile)?;
            let _lock = AuditLock::acquire()?;
            let bytes = std::fs::read(&staged.path)
                .map_err(|e| anyhow::anyhow!("staged file unreadable at {}: {}", staged.path, e))?;
            let (response, elapsed) = api.submit(&staged, bytes)?;
            let (text, stats) = render_and_record(&response, elapsed)?;
            state.last_audit = Some(CompletedAudit {
                response: response.clone(),
                elapsed_secs: elapsed,
                completed_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            });
            save_state(&state)?;
            if cli.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: serde_json::json!({
                            "report": response,
                            "elapsed_secs": elapsed,
                            "stats": stats,
                        })
                    })?
                );
            } else {
                println!("{}", text);
                println!();
                println!(
                    "recorded audit #{}; {} violations total",
                    stats.audit_count, stats.total_violations
                );
            }
        }
        Commands::Results { filter } => {
            let last = state.last_audit.as_ref().ok_or(NoResultError)?;
            let response = &last.response;
            let cards = render_cards(&response.violations);
            let kept = apply_filter(&cards, *filter);
            if cli.json {
                let card_objs: Vec<serde_json::Value> = kept
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "index": c.index,
                            "category": c.category,
                            "violation": &response.violations[c.index - 1],
                        })
                    })
                    .collect();
                println!(
                    "{}",
                    serde_json::to_string_pretty(&JsonOut {
                        ok: true,
                        data: serde_json::json!({
                            "policy_name": &response.policy_name,
                            "total_violations": response.total_violations,
                            "status": "Completed",
                            "elapsed_secs": last.elapsed_secs,
                            "completed_at": &last.completed_at,
                            "filter": filter,
                            "cards": card_objs,
                        })
                    })?
                );
            } else {
                println!("{}", render_summary(response, last.elapsed_secs));
                if response.violations.is_empty() {
                    println!();
                    println!("{}", NO_VIOLATIONS_TEXT);
                } else {
                    for card in kept {
                        println!("{}", card.body);
                    }
                }
            }
        }
        Commands::Stats => {
            let stats = stats::load()?;
            print_one(cli.json, stats, |s| {
                format!(
                    "audits: {}\nviolations: {}\nlast scan: {}",
                    s.audit_count,
                    s.total_violations,
                    s.last_scan_time.as_deref().unwrap_or("--")
                )
            })?;
        }
        Commands::Report { out, stdout } => {
            let last = state.last_audit.as_ref().ok_or(NoResultError)?;
            let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
            let content = report::generate(&last.response, &generated_at);
            if *stdout {
                print_one(cli.json, content, |c| c.clone())?;
            } else {
                let path = out.clone().unwrap_or_else(|| {
                    std::path::PathBuf::from(report::default_file_name(
                        Local::now().timestamp_millis(),
                    ))
                });
                std::fs::write(&path, &content)?;
                print_one(cli.json, path.to_string_lossy().to_string(), |p| {
                    format!("report written to {}", p)
                })?;
            }
        }
        Commands::Theme { value } => match value {
            Some(v) => {
                state.theme = Some(v.clone());
                save_state(&state)?;
                print_one(cli.json, v.clone(), |t| format!("theme set to {}", t))?;
            }
            None => {
                let current = state.theme.clone().unwrap_or_else(|| "light".to_string());
                print_one(cli.json, current, |t| format!("theme: {}", t))?;
            }
        },
    }

    Ok(())
}
