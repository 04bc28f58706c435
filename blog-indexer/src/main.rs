use clap::{Arg, ArgAction, ArgMatches, Command};
use std::path::Path;

mod error;
mod html;
mod ingest;
mod meta;
mod sitemap;

use ingest::BlogLayout;

// 主函数
fn main() {
    let root_arg = Arg::new("root")
        .short('r')
        .long("root")
        .value_name("SITE_DIR")
        .help("站点根目录路径")
        .default_value(".");

    let matches = Command::new("博客索引工具")
        .version(env!("CARGO_PKG_VERSION"))
        .about("导入原始文章并生成站点地图")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("显示详细信息")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .subcommand(
            Command::new("ingest")
                .about("导入 data/BlogData/RawData 下的原始文章到 posts.json")
                .arg(root_arg.clone()),
        )
        .subcommand(
            Command::new("sitemap")
                .about("根据 posts.json 重新生成 sitemap.xml")
                .arg(root_arg)
                .arg(
                    Arg::new("base_url")
                        .short('b')
                        .long("base-url")
                        .value_name("URL")
                        .help("站点的公开地址")
                        .required(true),
                ),
        )
        .get_matches();

    let verbose = matches.get_flag("verbose");

    let result = match matches.subcommand() {
        Some(("ingest", sub)) => run_ingest(sub, verbose),
        Some(("sitemap", sub)) => run_sitemap(sub),
        _ => unreachable!("subcommand_required"),
    };

    if let Err(e) = result {
        eprintln!("错误: {}", e);
        std::process::exit(1);
    }
}

fn site_root(matches: &ArgMatches) -> &Path {
    matches
        .get_one::<String>("root")
        .map(Path::new)
        .unwrap_or(Path::new("."))
}

fn run_ingest(matches: &ArgMatches, verbose: bool) -> error::Result<()> {
    let layout = BlogLayout::new(site_root(matches));
    println!("开始导入原始文章: {}", layout.raw_dir().display());

    let report = ingest::ingest(&layout, verbose)?;
    println!(
        "导入完成。新增 {} 篇文章，跳过 {} 个条目。",
        report.processed.len(),
        report.skipped
    );
    Ok(())
}

fn run_sitemap(matches: &ArgMatches) -> error::Result<()> {
    let root = site_root(matches);
    let layout = BlogLayout::new(root);
    let base_url = matches
        .get_one::<String>("base_url")
        .map(String::as_str)
        .unwrap_or_default();

    println!("读取文章索引: {}", layout.meta_file().display());
    let meta = meta::load_meta(&layout.meta_file())?;
    println!("共 {} 篇文章", meta.posts.len());

    let output = root.join("sitemap.xml");
    let published = sitemap::write_sitemap(&meta, base_url, &output)?;

    println!("站点地图已更新: {}", output.display());
    println!("- 首页: 2");
    println!("- 已发布文章: {}", published);
    println!("- 地址总数: {}", 2 + published);
    Ok(())
}
