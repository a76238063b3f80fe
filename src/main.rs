use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use plant_disease_common::{render_text, ResultView, SUBMIT_LABEL_LOADING};
use plant_disease_detector::{analyzer, cli, client, config, error, picker, scanner, session};
use analyzer::{AnalysisRecord, CacheFile};
use cli::{Cli, Commands, OutputFormat};
use client::HttpProcessor;
use config::Config;
use error::Result;
use session::Session;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const BATCH_OUTPUT_FILE: &str = "plant-disease-results.json";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = Config::load()?;

    match cli.command {
        Commands::Analyze { image, endpoint, output, format, use_cache, save_masked } => {
            let processor = HttpProcessor::from_config(&config, endpoint.as_deref())?;
            run_analyze(
                processor,
                &image,
                output.as_deref(),
                format,
                use_cache,
                save_masked.as_deref(),
            )
            .await?;
        }

        Commands::Pick { folder, endpoint, recursive } => {
            let processor = HttpProcessor::from_config(&config, endpoint.as_deref())?;
            match picker::pick_image(&folder, recursive)? {
                Some(image) => {
                    run_analyze(processor, &image, None, OutputFormat::Text, false, None).await?
                }
                None => println!("キャンセルしました"),
            }
        }

        Commands::Batch { folder, output, endpoint, use_cache, recursive } => {
            println!("🌿 plant-disease - 一括解析\n");

            // 1. 画像スキャン
            println!("[1/3] 画像をスキャン中...");
            let images = scanner::scan_folder(&folder, recursive)?;
            if images.is_empty() {
                return Err(error::DetectorError::NoImagesFound(folder.display().to_string()));
            }
            println!("✔ {}枚の画像を検出\n", images.len());

            // 2. 解析
            let processor = HttpProcessor::from_config(&config, endpoint.as_deref())?;
            println!(
                "[2/3] 解析中...{} ({})",
                if use_cache { " (キャッシュ有効)" } else { "" },
                processor.endpoint()
            );
            let mut session = Session::new(processor);
            let mut cache = use_cache.then(|| CacheFile::load(&folder));

            let bar = ProgressBar::new(images.len() as u64);
            bar.set_style(
                ProgressStyle::with_template("{spinner:.green} [{bar:30.green}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar()),
            );
            let summary = analyzer::analyze_images(&mut session, &images, cache.as_mut(), |index, image| {
                bar.set_position(index as u64);
                bar.set_message(image.file_name.clone());
            })
            .await;
            bar.finish_and_clear();

            for record in &summary.records {
                println!("  ✔ {}", summary_line(record));
            }
            for (file_name, message) in &summary.failures {
                println!("  ✘ {}: {}", file_name, message);
            }
            println!(
                "✔ 解析完了: 成功 {}件 / 失敗 {}件\n",
                summary.records.len(),
                summary.failures.len()
            );

            if let Some(cache) = &cache {
                cache.save(&folder)?;
            }

            // 3. 結果保存
            println!("[3/3] 結果を保存中...");
            let output = output.unwrap_or_else(|| folder.join(BATCH_OUTPUT_FILE));
            analyzer::save_records(&output, &summary.records)?;
            println!("✔ 結果を保存: {}", output.display());

            println!("\n✅ 完了");
        }

        Commands::Config { set_endpoint, set_timeout, show } => {
            let mut config = config;
            let mut changed = false;

            if let Some(endpoint) = set_endpoint {
                config.set_endpoint(endpoint)?;
                changed = true;
                println!("✔ エンドポイントを設定しました");
            }

            if let Some(seconds) = set_timeout {
                config.timeout_seconds = seconds;
                changed = true;
                println!("✔ タイムアウトを設定しました");
            }

            if changed {
                config.save()?;
            }

            if show || !changed {
                println!("設定:");
                println!("  エンドポイント: {}", config.endpoint);
                if let Ok(endpoint) = std::env::var(config::ENDPOINT_ENV) {
                    println!("    ({} により {} を使用)", config::ENDPOINT_ENV, endpoint);
                }
                match config.timeout() {
                    Some(timeout) => println!("  タイムアウト: {}秒", timeout.as_secs()),
                    None => println!("  タイムアウト: なし"),
                }
                println!("  設定ファイル: {}", Config::config_path()?.display());
            }
        }

        Commands::Cache { clear, folder, info } => {
            let target = folder.unwrap_or_else(|| PathBuf::from("."));
            let cache_path = CacheFile::cache_path(&target);

            if info || !clear {
                if cache_path.exists() {
                    let cache = CacheFile::load(&target);
                    println!("キャッシュ情報:");
                    println!("  パス: {}", cache_path.display());
                    println!("  件数: {}", cache.len());
                    if let Ok(meta) = std::fs::metadata(&cache_path) {
                        println!("  サイズ: {} bytes", meta.len());
                    }
                } else {
                    println!("キャッシュファイルが存在しません: {}", cache_path.display());
                }
            }

            if clear {
                match CacheFile::clear(&target) {
                    Ok(true) => println!("✔ キャッシュを削除しました: {}", cache_path.display()),
                    Ok(false) => println!("キャッシュファイルが存在しません"),
                    Err(e) => println!("キャッシュ削除エラー: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run_analyze(
    processor: HttpProcessor,
    image: &Path,
    output: Option<&Path>,
    format: OutputFormat,
    use_cache: bool,
    save_masked: Option<&Path>,
) -> Result<()> {
    println!("🌿 plant-disease - 画像解析\n");

    let folder = image
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let mut cache = use_cache.then(|| CacheFile::load(&folder));
    let mut session = Session::new(processor);

    println!("[1/2] 送信先: {}", session.processor().endpoint());
    let spinner = ProgressBar::new_spinner();
    spinner.set_message(SUBMIT_LABEL_LOADING);
    spinner.enable_steady_tick(Duration::from_millis(100));
    let outcome = analyzer::analyze_image(&mut session, image, cache.as_mut()).await;
    spinner.finish_and_clear();

    if let Some(upload) = session.upload() {
        match session.preview() {
            Some(preview) => println!(
                "🖼  {} {}x{} ({}, {})",
                upload.file_name,
                preview.width,
                preview.height,
                upload.mime_type,
                plant_disease_detector::upload::format_size(upload.bytes.len() as u64)
            ),
            None => println!("🖼  {} (プレビューなし)", upload.file_name),
        }
    }

    let record = outcome?;
    if record.cached {
        println!("✔ キャッシュから取得");
    }

    println!("\n[2/2] 結果");
    match format {
        OutputFormat::Text => println!("{}", render_text(&ResultView::from(&record.result))),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&record.result)?),
    }

    if let Some(cache) = &cache {
        cache.save(&folder)?;
    }

    if let Some(output) = output {
        analyzer::save_records(output, std::slice::from_ref(&record))?;
        println!("\n✔ 結果を保存: {}", output.display());
    }

    if let Some(path) = save_masked {
        match record.result.masked_image_url() {
            Some(url) => {
                let bytes = session.processor().fetch_masked_image(url).await?;
                std::fs::write(path, bytes)?;
                println!("✔ 処理済み画像を保存: {}", path.display());
            }
            None => println!("処理済み画像はありません"),
        }
    }

    Ok(())
}

fn summary_line(record: &AnalysisRecord) -> String {
    let view = ResultView::from(&record.result);
    let mut line = format!("{}: {}", record.file_name, view.predicted_class);
    if let Some(severity) = &view.severity {
        line.push_str(&format!(" ({})", severity.affected_area));
    }
    if record.cached {
        line.push_str(" [cache]");
    }
    line
}
