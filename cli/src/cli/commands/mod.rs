use std::collections::HashMap;
use std::process;

use anyhow::{Context as _, Result, anyhow, bail};
use nationsim_core::{DiplomaticAction, GameState, GovernmentType};

use super::{
    parse_budget, parse_percentage, parse_switch, print_country_details, print_help,
    print_overview, print_reports, resolve_country,
};

pub struct Context<'a> {
    game: &'a mut GameState,
}

impl<'a> Context<'a> {
    pub fn new(game: &'a mut GameState) -> Self {
        Self { game }
    }

    pub fn game(&self) -> &GameState {
        &*self.game
    }

    pub fn game_mut(&mut self) -> &mut GameState {
        &mut *self.game
    }
}

pub struct Args<'a> {
    tokens: Vec<&'a str>,
    index: usize,
}

impl<'a> Args<'a> {
    pub fn new(tokens: Vec<&'a str>) -> Self {
        Self { tokens, index: 0 }
    }

    pub fn next(&mut self) -> Option<&'a str> {
        let value = self.tokens.get(self.index).copied()?;
        self.index += 1;
        Some(value)
    }

    pub fn next_required(&mut self, message: &str) -> Result<&'a str> {
        self.next().ok_or_else(|| anyhow!(message.to_owned()))
    }

    pub fn rest(&mut self) -> impl Iterator<Item = &'a str> + '_ {
        let start = self.index;
        self.index = self.tokens.len();
        self.tokens[start..].iter().copied()
    }
}

pub trait Command {
    fn name() -> &'static str;
    fn execute(ctx: &mut Context<'_>, args: Args<'_>) -> Result<()>;
}

type CommandFn = for<'a> fn(&mut Context<'a>, Args<'a>) -> Result<()>;

pub struct CommandRegistry {
    handlers: HashMap<&'static str, CommandFn>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<C: Command>(&mut self) {
        self.register_as(C::name(), C::execute);
    }

    fn register_as(&mut self, name: &'static str, handler: CommandFn) {
        if self.handlers.insert(name, handler).is_some() {
            panic!("重複したコマンド登録です: {name}");
        }
    }

    pub fn dispatch<'a>(&self, command: &str, ctx: &mut Context<'a>, args: Args<'a>) -> Result<()> {
        if let Some(handler) = self.handlers.get(command) {
            handler(ctx, args)
        } else {
            bail!("未対応のコマンドです: {command}. help で一覧を確認してください。");
        }
    }

    pub fn execute_input<'a>(&self, ctx: &mut Context<'a>, input: &'a str) -> Result<()> {
        let mut parts = input.split_whitespace();
        let Some(head) = parts.next() else {
            return Err(anyhow!("コマンドが指定されていません。"));
        };
        let command_name = head.to_ascii_lowercase();
        let args = Args::new(parts.collect());
        self.dispatch(command_name.as_str(), ctx, args)
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry.register::<HelpCommand>();
        registry.register_as("?", HelpCommand::execute);
        registry.register::<OverviewCommand>();
        registry.register_as("ov", OverviewCommand::execute);
        registry.register::<InspectCommand>();
        registry.register_as("show", InspectCommand::execute);
        registry.register::<SelectCommand>();
        registry.register::<RelationsCommand>();
        registry.register::<TaxCommand>();
        registry.register::<BudgetCommand>();
        registry.register::<DiplomacyCommand>();
        registry.register::<GovernmentTypeCommand>();
        registry.register::<LawCommand>();
        registry.register::<TickCommand>();
        registry.register::<RunCommand>();
        registry.register::<PauseCommand>();
        registry.register::<ResumeCommand>();
        registry.register::<SpeedCommand>();
        registry.register::<StatsCommand>();
        registry.register::<EventsCommand>();
        registry.register::<JsonCommand>();
        registry.register::<QuitCommand>();
        registry.register_as("exit", QuitCommand::execute);
        registry
    }
}

pub struct HelpCommand;

impl Command for HelpCommand {
    fn name() -> &'static str {
        "help"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_help();
        Ok(())
    }
}

pub struct OverviewCommand;

impl Command for OverviewCommand {
    fn name() -> &'static str {
        "overview"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        print_overview(ctx.game());
        Ok(())
    }
}

pub struct InspectCommand;

impl Command for InspectCommand {
    fn name() -> &'static str {
        "inspect"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let id = match args.next() {
            Some(token) => resolve_country(ctx.game(), token)?,
            None => ctx.game().selected(),
        };
        let snapshot = ctx.game().country_snapshot(id)?;
        print_country_details(&snapshot);
        Ok(())
    }
}

pub struct SelectCommand;

impl Command for SelectCommand {
    fn name() -> &'static str {
        "select"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("選択する国を指定してください。")?;
        let id = resolve_country(ctx.game(), token)?;
        ctx.game_mut().select_country(id)?;
        println!("{} を選択しました。", ctx.game().countries()[id.index()].name);
        Ok(())
    }
}

pub struct RelationsCommand;

impl Command for RelationsCommand {
    fn name() -> &'static str {
        "relations"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let id = match args.next() {
            Some(token) => resolve_country(ctx.game(), token)?,
            None => ctx.game().selected(),
        };
        let summary = ctx.game().diplomatic_summary(id)?;
        println!("-- {} の外交関係 --", ctx.game().countries()[id.index()].name);
        for relation in &summary.relations {
            let mut flags = Vec::new();
            if relation.trade_deal {
                flags.push("貿易");
            }
            if relation.sanctions {
                flags.push("制裁");
            }
            println!(
                "  {:<16} {:>7.1} {:<4} {}",
                relation.partner_name,
                relation.relation_value,
                relation.status.label(),
                flags.join(" ")
            );
        }
        if !summary.wars.is_empty() {
            println!("交戦中: {}", summary.wars.join(", "));
        }
        if !summary.alliances.is_empty() {
            println!("同盟国: {}", summary.alliances.join(", "));
        }
        Ok(())
    }
}

pub struct TaxCommand;

impl Command for TaxCommand {
    fn name() -> &'static str {
        "tax"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("税率(%)を指定してください。")?;
        let rate = parse_percentage(token, "税率")?;
        let applied = ctx.game_mut().set_tax_rate(rate)?;
        println!("税率を {:.1}% に設定しました。", applied * 100.0);
        Ok(())
    }
}

pub struct BudgetCommand;

impl Command for BudgetCommand {
    fn name() -> &'static str {
        "budget"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let shares = parse_budget(args.rest())?;
        let spending = ctx.game_mut().allocate_budget(shares)?;
        println!(
            "予算配分を更新しました (配分済み {:.1}%, その他 {:.1}%)",
            spending.allocated_total() * 100.0,
            spending.other * 100.0
        );
        Ok(())
    }
}

pub struct DiplomacyCommand;

impl Command for DiplomacyCommand {
    fn name() -> &'static str {
        "diplo"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let target_token = args.next_required("外交相手を指定してください。")?;
        let action_token = args.next_required("外交行動を指定してください。")?;
        let target = resolve_country(ctx.game(), target_token)?;
        let action: DiplomaticAction = action_token.parse()?;
        let outcome = ctx.game_mut().perform_diplomatic_action(target, action)?;
        if outcome.success {
            println!("成功: {}", outcome.message);
        } else {
            println!("失敗: {}", outcome.message);
        }
        Ok(())
    }
}

pub struct GovernmentTypeCommand;

impl Command for GovernmentTypeCommand {
    fn name() -> &'static str {
        "govtype"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("新しい政体を指定してください。")?;
        let kind: GovernmentType = token.parse()?;
        ctx.game_mut().change_government_type(kind)?;
        println!("政体を {} に変更しました。", kind);
        Ok(())
    }
}

pub struct LawCommand;

impl Command for LawCommand {
    fn name() -> &'static str {
        "law"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let name = args.next_required("法律名を指定してください。")?;
        let value = parse_switch(args.next_required("on または off を指定してください。")?)?;
        ctx.game_mut().pass_law(name, value)?;
        println!("法律 {} を {} にしました。", name, if value { "有効" } else { "無効" });
        Ok(())
    }
}

pub struct TickCommand;

impl Command for TickCommand {
    fn name() -> &'static str {
        "tick"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let ticks: u64 = match args.next() {
            Some(token) => token
                .parse()
                .map_err(|_| anyhow!("月数は 0 以上の整数で指定してください。"))?,
            None => 1,
        };
        let reports = ctx.game_mut().advance_time(ticks);
        println!("--- {} まで進みました ---", ctx.game().calendar_date());
        print_reports(&reports);
        Ok(())
    }
}

pub struct RunCommand;

impl Command for RunCommand {
    fn name() -> &'static str {
        "run"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("経過時間を指定してください。")?;
        let elapsed: f64 = token
            .parse()
            .map_err(|_| anyhow!("経過時間は数値で指定してください。"))?;
        if ctx.game().is_paused() {
            println!("一時停止中のため時間は進みません。");
            return Ok(());
        }
        let before = ctx.game().time_status().total_ticks;
        let reports = ctx.game_mut().advance(elapsed)?;
        let status = ctx.game().time_status();
        println!(
            "--- {} ティック経過 ({}) ---",
            status.total_ticks - before,
            status.calendar
        );
        print_reports(&reports);
        Ok(())
    }
}

pub struct PauseCommand;

impl Command for PauseCommand {
    fn name() -> &'static str {
        "pause"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        ctx.game_mut().set_pause(true);
        println!("一時停止しました。");
        Ok(())
    }
}

pub struct ResumeCommand;

impl Command for ResumeCommand {
    fn name() -> &'static str {
        "resume"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        ctx.game_mut().set_pause(false);
        println!("再開しました。");
        Ok(())
    }
}

pub struct SpeedCommand;

impl Command for SpeedCommand {
    fn name() -> &'static str {
        "speed"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let token = args.next_required("新しい時間倍率を指定してください。")?;
        let multiplier: f64 = token
            .trim_start_matches('x')
            .parse()
            .map_err(|_| anyhow!("時間倍率は数値で指定してください。"))?;
        let applied = ctx.game_mut().set_speed(multiplier)?;
        println!("時間倍率 x{:.2} に設定しました。", applied);
        Ok(())
    }
}

pub struct StatsCommand;

impl Command for StatsCommand {
    fn name() -> &'static str {
        "stats"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let stats = ctx.game().world_stats();
        let status = ctx.game().time_status();
        println!(
            "{} / 倍率 x{:.2}{}",
            status.calendar,
            status.time_multiplier,
            if status.paused { " (一時停止中)" } else { "" }
        );
        println!(
            "国数 {} / 総人口 {:.0} / 総GDP {:.0}",
            stats.total_countries, stats.total_population, stats.total_gdp
        );
        println!(
            "平均安定度 {:.1} / 平均幸福度 {:.1} / 戦争 {} / 同盟 {}",
            stats.average_stability,
            stats.average_happiness,
            stats.active_wars,
            stats.active_alliances
        );
        if let Some(strongest) = stats.strongest_country {
            println!("最強国: {strongest}");
        }
        Ok(())
    }
}

pub struct EventsCommand;

impl Command for EventsCommand {
    fn name() -> &'static str {
        "events"
    }

    fn execute(ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        let events = ctx.game().recent_events();
        println!("-- 最近の外交 --");
        for entry in events.diplomatic.iter().rev().take(10) {
            let origin = if entry.player_initiated { "[自国]" } else { "" };
            println!("  {origin}{}", entry.message);
        }
        println!("-- 各国の出来事 --");
        for country in events.countries.iter().filter(|c| !c.events.is_empty()) {
            for event in &country.events {
                println!("  {}", event.description);
            }
        }
        Ok(())
    }
}

pub struct JsonCommand;

impl Command for JsonCommand {
    fn name() -> &'static str {
        "json"
    }

    fn execute(ctx: &mut Context<'_>, mut args: Args<'_>) -> Result<()> {
        let id = match args.next() {
            Some(token) => resolve_country(ctx.game(), token)?,
            None => ctx.game().selected(),
        };
        let snapshot = ctx.game().country_snapshot(id)?;
        let json = serde_json::to_string_pretty(&snapshot)
            .context("スナップショットの JSON 変換に失敗しました")?;
        println!("{json}");
        Ok(())
    }
}

pub struct QuitCommand;

impl Command for QuitCommand {
    fn name() -> &'static str {
        "quit"
    }

    fn execute(_ctx: &mut Context<'_>, _args: Args<'_>) -> Result<()> {
        println!("シミュレーションを終了します。");
        process::exit(0);
    }
}
