mod commands;

use std::io::{self, BufRead, Write};

use anyhow::{Context as _, Result, anyhow, bail};
use nationsim_core::{BudgetShares, CountryId, CountrySnapshot, GameState};

use commands::{CommandRegistry, Context};

pub fn run(game: &mut GameState) -> Result<()> {
    let registry = CommandRegistry::default();
    print_intro(game);
    let stdin = io::stdin();

    loop {
        print!("{}> ", game.calendar_date());
        io::stdout()
            .flush()
            .context("プロンプトのフラッシュに失敗しました")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("入力の読み込みに失敗しました")?;

        if bytes == 0 {
            println!("入力が終了したためシミュレーションを終了します。");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let mut ctx = Context::new(game);
        if let Err(error) = registry.execute_input(&mut ctx, trimmed) {
            println!("エラー: {error}");
        }
    }
}

fn print_intro(game: &GameState) {
    let player = &game.countries()[game.player().index()];
    println!("ネイションシム へようこそ。");
    println!(
        "{} ヶ国が存在し、あなたは {} を率います。",
        game.countries().len(),
        player.name
    );
    println!("コマンド例: overview / inspect 2 / tax 20 / diplo 3 trade_deal / tick 12");
    println!("help で利用可能なコマンド一覧を表示します。");
}

pub(crate) fn print_help() {
    println!("利用可能なコマンド:");
    println!("  overview                 各国の主要指標を一覧表示");
    println!("  inspect [国]             国の詳細を表示 (省略時は選択中の国)");
    println!("  select <国>              表示対象の国を選択");
    println!("  relations [国]           外交関係の一覧を表示");
    println!("  tax <%>                  自国の税率を設定");
    println!("  budget <分野> <%> ...    自国の予算配分を設定");
    println!("                           分野: healthcare | education | military | infrastructure | welfare");
    println!("  diplo <国> <行動>        外交行動を実行");
    println!("                           行動: improve_relations | worsen_relations | trade_deal | alliance");
    println!("                                 war_declaration | peace_treaty | sanctions | foreign_aid");
    println!("  govtype <政体>           政体を変更 (democracy | monarchy | dictatorship | republic)");
    println!("  law <法律> <on|off>      法律を制定・廃止");
    println!("  tick [月数]              時間を進める (省略時は 1 か月)");
    println!("  run <経過>               現在の速度で経過時間ぶん進める");
    println!("  pause | resume           一時停止の切り替え");
    println!("  speed <倍率>             時間倍率を設定 (0.1 - 5.0)");
    println!("  stats                    世界全体の統計を表示");
    println!("  events                   最近の出来事を表示");
    println!("  json [国]                国のスナップショットを JSON で出力");
    println!("  quit                     終了");
}

pub(crate) fn print_overview(game: &GameState) {
    println!(
        "ID | {:<16} | {:<6} | {:>12} | {:>10} | {:>5} | {:>5} | {:>5}",
        "国名", "政体", "GDP", "人口", "安定", "幸福", "支持"
    );
    for country in game.countries() {
        let marker = if country.is_player() { "*" } else { " " };
        println!(
            "{:>2}{}| {:<16} | {:<6} | {:>12.0} | {:>10.0} | {:>5.1} | {:>5.1} | {:>5.1}",
            country.id().index() + 1,
            marker,
            country.name,
            country.government.kind().label(),
            country.economy.gdp,
            country.population.total,
            country.government.stability,
            country.population.happiness,
            country.population.get_approval_rating()
        );
    }
}

pub(crate) fn print_country_details(snapshot: &CountrySnapshot) {
    let economy = &snapshot.economy;
    let population = &snapshot.population;
    let government = &snapshot.government;
    println!("-- {} の状況 --", snapshot.name);
    println!(
        "政体: {} / 与党: {} / 在任 {:.1} 年",
        government.label, government.ruling_party, government.years_in_power
    );
    if let Some(next) = government.next_election {
        println!("次の選挙まで: {next:.1} 年");
    }
    println!("安定度: {:.1} / 汚職: {:.1}", government.stability, government.corruption);
    println!(
        "GDP: {:.0} (一人当たり {:.1}) / 経済健全度: {:.1}",
        economy.gdp, economy.gdp_per_capita, economy.economic_health
    );
    println!(
        "税率: {:.1}% / 失業率: {:.1}% / インフレ率: {:.1}% / 債務: {:.0}",
        economy.tax_rate * 100.0,
        economy.unemployment * 100.0,
        economy.inflation * 100.0,
        economy.debt
    );
    let spending = &economy.spending;
    println!(
        "予算配分: 医療 {:.0}% 教育 {:.0}% 軍事 {:.0}% インフラ {:.0}% 福祉 {:.0}% その他 {:.0}%",
        spending.healthcare * 100.0,
        spending.education * 100.0,
        spending.military * 100.0,
        spending.infrastructure * 100.0,
        spending.welfare * 100.0,
        spending.other * 100.0
    );
    println!(
        "人口: {:.0} / 幸福度: {:.1} / 健康: {:.1} / 教育: {:.1}",
        population.total, population.happiness, population.health, population.education
    );
    println!(
        "支持率: {:.1} / 抗議リスク: {:.2}",
        population.approval_rating, population.protest_risk
    );
    println!("軍事力: {:.2} / 国力: {:.1}", snapshot.military_strength, snapshot.power_score);
    let traits: Vec<String> = snapshot.traits.iter().map(|t| format!("{t:?}")).collect();
    println!("特性: {}", traits.join(", "));
    let laws: Vec<String> = government
        .laws
        .iter()
        .map(|(name, enabled)| format!("{name}={}", if *enabled { "on" } else { "off" }))
        .collect();
    println!("法律: {}", laws.join(", "));
    if !snapshot.recent_events.is_empty() {
        println!("最近の出来事:");
        for event in &snapshot.recent_events {
            println!("  - {}", event.description);
        }
    }
}

pub(crate) fn print_reports(reports: &[String]) {
    if reports.is_empty() {
        println!("特筆すべき出来事はありませんでした。");
        return;
    }
    for report in reports {
        println!("- {report}");
    }
}

pub(crate) fn resolve_country(game: &GameState, token: &str) -> Result<CountryId> {
    game.find_country(token).ok_or_else(|| {
        anyhow!(
            "国を特定できませんでした: {} (番号か完全な国名を入力してください)",
            token
        )
    })
}

pub(crate) fn parse_percentage(token: &str, label: &str) -> Result<f64> {
    let value: f64 = token
        .trim_end_matches('%')
        .parse()
        .map_err(|_| anyhow!("{label} は数値で指定してください。"))?;
    if !value.is_finite() || value < 0.0 {
        bail!("{label} は 0 以上の数値で指定してください。");
    }
    Ok(value / 100.0)
}

pub(crate) fn parse_budget<'a>(mut tokens: impl Iterator<Item = &'a str>) -> Result<BudgetShares> {
    let mut shares = BudgetShares::default();
    let mut any = false;
    while let Some(field) = tokens.next() {
        let value_token = tokens
            .next()
            .ok_or_else(|| anyhow!("{field} の割合を指定してください。"))?;
        let value = parse_percentage(value_token, field)?;
        shares = match field.to_ascii_lowercase().as_str() {
            "healthcare" | "health" => shares.healthcare(value),
            "education" | "edu" => shares.education(value),
            "military" | "mil" => shares.military(value),
            "infrastructure" | "infra" => shares.infrastructure(value),
            "welfare" => shares.welfare(value),
            other => bail!("未知の予算分野です: {other}"),
        };
        any = true;
    }
    if !any {
        bail!("予算分野と割合を指定してください。");
    }
    Ok(shares)
}

pub(crate) fn parse_switch(token: &str) -> Result<bool> {
    match token.to_ascii_lowercase().as_str() {
        "on" | "true" | "yes" | "1" => Ok(true),
        "off" | "false" | "no" | "0" => Ok(false),
        other => bail!("on または off を指定してください: {other}"),
    }
}
