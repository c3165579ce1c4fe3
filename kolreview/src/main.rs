//! kolreview CLI
//! 子命令：configs（列配置）/ check（审核）/ fix（自动修复）/ review（完整流水线）

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use kolreview::engine::StageSnapshot;
use kolreview::{
    parse_content, render_plain_document, render_review_report, run_all_checks, ConfigStore,
    KolError, ReviewPipeline, ReviewStage, RewriteClient, RewriteOptions,
};

#[derive(Parser)]
#[command(name = "kolreview", version, about = "小红书KOL营销文案审核流水线")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 列出配置目录下的活动配置
    Configs {
        /// 配置目录
        #[arg(long, default_value = "configs")]
        dir: PathBuf,
    },
    /// 审核一份文案，输出各项检查结果
    Check {
        /// 活动配置文件（JSON）
        #[arg(long)]
        config: PathBuf,
        /// 待审核文案（纯文本）
        #[arg(long)]
        input: PathBuf,
        /// 以 JSON 输出结果
        #[arg(long)]
        json: bool,
    },
    /// 自动修复可修复的违规，输出变更记录
    Fix {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        input: PathBuf,
        /// 修复后的文档写入路径
        #[arg(long)]
        out: Option<PathBuf>,
        #[arg(long)]
        json: bool,
    },
    /// 完整审稿流水线：自动修复 → AI人话改写（可跳过）→ 定稿
    Review {
        #[arg(long)]
        config: PathBuf,
        #[arg(long)]
        input: PathBuf,
        /// 跳过 AI 改写环节
        #[arg(long)]
        skip_ai: bool,
        /// 审稿对比报告（Markdown）写入路径
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn init_logging() {
    let _ = tracing_log::LogTracer::init();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

async fn load_config(path: &Path) -> anyhow::Result<Arc<kolreview::RuleConfig>> {
    let store = ConfigStore::new(path.parent().unwrap_or_else(|| Path::new(".")));
    let config = store
        .load_path(path)
        .await
        .with_context(|| format!("加载配置 {} 失败", path.display()))?;
    Ok(Arc::new(config))
}

fn print_results(snapshot_results: &[kolreview::CheckResult]) {
    for r in snapshot_results {
        let mark = if r.pass { "✅" } else { "❌" };
        println!("{mark} {:<16} {}", r.id.to_string(), r.message);
    }
}

fn print_changes(snapshot: &StageSnapshot) {
    if snapshot.changes.is_empty() {
        println!("（无自动修复变更）");
        return;
    }
    for c in &snapshot.changes {
        let old = if c.old.is_empty() { "(缺失)" } else { c.old.as_str() };
        let new = if c.new.is_empty() { "(删除)" } else { c.new.as_str() };
        println!(
            "  {}：「{}」→「{}」 ×{}（{}）",
            c.kind.label(),
            old,
            new,
            c.count,
            c.scope.label()
        );
    }
}

async fn cmd_configs(dir: PathBuf) -> anyhow::Result<()> {
    let store = ConfigStore::new(&dir);
    let summaries = store.list().await?;
    if summaries.is_empty() {
        println!("目录 {} 下没有可用配置", dir.display());
        return Ok(());
    }
    for s in summaries {
        println!("{:<24} {}", s.file, s.label);
    }
    Ok(())
}

async fn cmd_check(config: PathBuf, input: PathBuf, json: bool) -> anyhow::Result<()> {
    let config = load_config(&config).await?;
    let raw = tokio::fs::read_to_string(&input)
        .await
        .with_context(|| format!("读取文案 {} 失败", input.display()))?;

    let content = parse_content(&raw, config.hard_rules.titles.required_count);
    if content.is_empty() {
        anyhow::bail!("{}", KolError::InvalidInput("内容为空，无可审核文本".into()));
    }
    let results = run_all_checks(&content, &config);

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        println!("== {} ==", config.meta.label());
        print_results(&results);
    }
    Ok(())
}

async fn cmd_fix(
    config: PathBuf,
    input: PathBuf,
    out: Option<PathBuf>,
    json: bool,
) -> anyhow::Result<()> {
    let config = load_config(&config).await?;
    let raw = tokio::fs::read_to_string(&input).await?;

    let mut pipeline = ReviewPipeline::upload(config, &raw, None)?;
    pipeline.auto_fix()?;
    let snapshot = pipeline.current();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "changes": snapshot.changes,
                "results": snapshot.results,
                "content": snapshot.content,
            }))?
        );
    } else {
        println!("== 自动修复 ==");
        print_changes(snapshot);
        println!("== 修复后审核 ==");
        print_results(&snapshot.results);
    }

    if let Some(out) = out {
        tokio::fs::write(&out, render_plain_document(&snapshot.content)).await?;
        println!("修复后的文档已写入 {}", out.display());
    }
    Ok(())
}

async fn cmd_review(
    config: PathBuf,
    input: PathBuf,
    skip_ai: bool,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = load_config(&config).await?;
    let raw = tokio::fs::read_to_string(&input).await?;

    let rewriter = if skip_ai {
        None
    } else {
        match RewriteClient::from_env(RewriteOptions::default()).await {
            Ok(client) => Some(client),
            Err(KolError::RewriteUnavailable) => {
                tracing::warn!("AI改写未配置（缺少 GOOGLE_API_KEY），将跳过改写环节");
                None
            }
            Err(e) => return Err(e.into()),
        }
    };

    let mut pipeline = ReviewPipeline::upload(config, &raw, rewriter)?;
    pipeline.auto_fix()?;

    if pipeline.has_rewriter() {
        if let Err(e) = pipeline.humanize().await {
            tracing::warn!("AI改写失败（{}），改为跳过", e);
            pipeline.skip_ai()?;
        }
    } else {
        pipeline.skip_ai()?;
    }

    pipeline.finalize()?;

    let final_snapshot = pipeline.current();
    println!("== 终稿审核（{}）==", ReviewStage::Final.label());
    print_results(&final_snapshot.results);
    println!("== 全部修改 ==");
    let changes = pipeline.all_changes();
    if changes.is_empty() {
        println!("（无修改）");
    }
    for c in &changes {
        let old = if c.old.is_empty() { "(缺失)" } else { c.old.as_str() };
        let new = if c.new.is_empty() { "(删除)" } else { c.new.as_str() };
        println!("  {}：「{}」→「{}」 ×{}", c.kind.label(), old, new, c.count);
    }

    if let Some(report_path) = report {
        let segments = pipeline.diff(ReviewStage::Draft, ReviewStage::Final)?;
        let markdown = render_review_report(
            "审稿对比",
            &final_snapshot.content.titles,
            &segments,
            &final_snapshot.content.tags,
            &final_snapshot.results,
            &changes,
        );
        tokio::fs::write(&report_path, markdown).await?;
        println!("审稿报告已写入 {}", report_path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();

    match cli.command {
        Commands::Configs { dir } => cmd_configs(dir).await,
        Commands::Check { config, input, json } => cmd_check(config, input, json).await,
        Commands::Fix { config, input, out, json } => cmd_fix(config, input, out, json).await,
        Commands::Review { config, input, skip_ai, report } => {
            cmd_review(config, input, skip_ai, report).await
        }
    }
}
