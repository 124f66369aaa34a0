use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::rc::Rc;

use anyhow::{Context, Result, anyhow, bail};
use carwash_core::{
    CarWash, EventJournal, PricingMode, ServiceCategory, Statistics, SupplyItem, UpgradeKind,
};

pub fn run(game: &mut CarWash, journal: &Rc<RefCell<EventJournal>>) -> Result<()> {
    print_intro(game);
    let stdin = io::stdin();

    loop {
        print!("day {} {}> ", game.day(), format_clock(game.now_minute()));
        io::stdout().flush().context("failed to flush the prompt")?;

        let mut line = String::new();
        let bytes = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read input")?;

        if bytes == 0 {
            println!("input closed, shutting down.");
            return Ok(());
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Err(error) = dispatch_command(game, journal, trimmed) {
            println!("Error: {error}");
        }
    }
}

fn dispatch_command(
    game: &mut CarWash,
    journal: &Rc<RefCell<EventJournal>>,
    input: &str,
) -> Result<()> {
    let mut parts = input.split_whitespace();
    let command = parts
        .next()
        .ok_or_else(|| anyhow!("no command given"))?
        .to_ascii_lowercase();

    match command.as_str() {
        "help" | "?" => {
            print_help();
            Ok(())
        }
        "status" | "st" => {
            print_status(game);
            Ok(())
        }
        "dashboard" | "dash" => {
            print_status(game);
            print_bays(game);
            print_services(game);
            Ok(())
        }
        "services" => {
            print_services(game);
            Ok(())
        }
        "bays" => {
            print_bays(game);
            Ok(())
        }
        "queue" => {
            println!("queue: {}", game.queue_status());
            Ok(())
        }
        "next" | "n" => {
            let hours = match parts.next() {
                Some(token) => token
                    .parse::<u32>()
                    .map_err(|_| anyhow!("the number of hours must be a positive integer"))?,
                None => 1,
            };
            if hours == 0 {
                bail!("the number of hours must be a positive integer");
            }
            for _ in 0..hours {
                for line in game.simulate_hour()? {
                    println!("- {line}");
                }
            }
            Ok(())
        }
        "endday" => {
            for line in game.end_current_day() {
                println!("- {line}");
            }
            Ok(())
        }
        "book" => {
            let service = parts
                .next()
                .ok_or_else(|| anyhow!("which service? (see: services)"))?;
            let count = match parts.next() {
                Some(token) => token
                    .parse::<i32>()
                    .map_err(|_| anyhow!("the number of cars must be an integer"))?,
                None => 1,
            };
            let booked = game.book_cars(service, count)?;
            println!("booked {booked} of {count} car(s) onto {service}");
            Ok(())
        }
        "shop" => {
            print_shop();
            Ok(())
        }
        "buysupplies" | "buy" => {
            let item_token = parts
                .next()
                .ok_or_else(|| anyhow!("which supply? (water, shampoo or wax)"))?;
            let item = SupplyItem::parse(item_token)?;
            let packs = match parts.next() {
                Some(token) => token
                    .parse::<i32>()
                    .map_err(|_| anyhow!("the number of packs must be an integer"))?,
                None => 1,
            };
            println!("{}", game.buy_supplies(item, packs)?);
            Ok(())
        }
        "upgrades" => {
            print_upgrades(game);
            Ok(())
        }
        "buyupgrade" => {
            let id = parts
                .next()
                .ok_or_else(|| anyhow!("which upgrade? (see: upgrades)"))?
                .parse::<u32>()
                .map_err(|_| anyhow!("the upgrade id must be a number"))?;
            let kind = UpgradeKind::from_id(id)?;
            println!("{}", game.buy_upgrade(kind)?);
            Ok(())
        }
        "upgradebay" => {
            let id = parts
                .next()
                .ok_or_else(|| anyhow!("which bay? (see: bays)"))?
                .parse::<u32>()
                .map_err(|_| anyhow!("the bay id must be a number"))?;
            let category_token = parts
                .next()
                .ok_or_else(|| anyhow!("which capability? (deluxe or wax)"))?;
            let category = ServiceCategory::parse(category_token)?;
            println!("{}", game.upgrade_bay(id, category)?);
            Ok(())
        }
        "setpricing" => {
            let token = parts
                .next()
                .ok_or_else(|| anyhow!("which mode? (aggressive, balanced or conservative)"))?;
            let mode = PricingMode::parse(token)?;
            game.set_pricing_mode(mode);
            println!("pricing mode set to {}", mode.label());
            Ok(())
        }
        "prices" => {
            let factor = parts
                .next()
                .ok_or_else(|| anyhow!("by what factor? (e.g. prices 1.10)"))?
                .parse::<f64>()
                .map_err(|_| anyhow!("the price factor must be a number"))?;
            game.adjust_service_prices(factor)?;
            println!("all prices adjusted by x{factor:.2}");
            Ok(())
        }
        "reports" => {
            print_reports(game);
            Ok(())
        }
        "stats" => {
            print_stats(game);
            Ok(())
        }
        "events" => {
            let journal = journal.borrow();
            if journal.lines().is_empty() {
                println!("no events yet.");
            }
            for line in journal.lines() {
                println!("- {line}");
            }
            Ok(())
        }
        "quit" | "exit" => {
            println!("closing up, see you tomorrow.");
            std::process::exit(0);
        }
        other => {
            bail!("unknown command: {other}. try help for the full list.");
        }
    }
}

fn format_clock(minute: i32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

fn print_intro(game: &CarWash) {
    println!("Welcome to {}.", game.name());
    println!(
        "Open {} to {}, {} bay(s), {} service(s) on the menu.",
        format_clock(game.opening_minute()),
        format_clock(game.closing_minute()),
        game.bay_count(),
        game.service_count()
    );
    println!("Try: status / next / book Basic 2 / shop / upgrades");
    println!("help lists every command.");
}

fn print_help() {
    println!("available commands:");
    println!("  status                cash, reputation, queue and stock at a glance");
    println!("  dashboard             status plus bays and the service menu");
    println!("  services              the service menu");
    println!("  bays                  bay availability and capabilities");
    println!("  queue                 waiting and lost customers");
    println!("  next [hours]          simulate one or more hours");
    println!("  endday                close the day early and file the report");
    println!("  book <service> [n]    book walk-in cars by hand");
    println!("  shop                  supply pack prices");
    println!("  buysupplies <item> [packs]");
    println!("  upgrades              the upgrade catalog");
    println!("  buyupgrade <id>       purchase an upgrade");
    println!("  upgradebay <id> <deluxe|wax>");
    println!("  setpricing <mode>     aggressive | balanced | conservative");
    println!("  prices <factor>       scale every price (e.g. prices 1.10)");
    println!("  reports               daily report history");
    println!("  stats                 aggregate statistics");
    println!("  events                the event journal");
    println!("  quit                  leave the game");
}

fn print_status(game: &CarWash) {
    println!("-- {} --", game.name());
    println!(
        "day {} at {} (closes {})",
        game.day(),
        format_clock(game.now_minute()),
        format_clock(game.closing_minute())
    );
    println!("cash: {:.2} EUR", game.cash());
    println!(
        "reputation: {:.2} / 5.0 (avg satisfaction {:.2} over {} cars)",
        game.reputation_score(),
        game.average_satisfaction(),
        game.total_cars_served()
    );
    println!("pricing mode: {}", game.pricing_mode().label());
    println!("queue: {}", game.queue_status());
    println!("stock: {}", game.inventory());
}

fn print_services(game: &CarWash) {
    println!("service menu:");
    for service in game.services() {
        println!("  {service}");
    }
}

fn print_bays(game: &CarWash) {
    println!("bays:");
    for bay in game.bays() {
        println!("  {bay}");
    }
}

fn print_shop() {
    println!("supply shop (per pack):");
    for item in [SupplyItem::Water, SupplyItem::Shampoo, SupplyItem::Wax] {
        let amounts = item.pack_amounts();
        let quantity = amounts.water + amounts.shampoo + amounts.wax;
        println!(
            "  {:<8} {:>6.2} EUR for {} units",
            item.label(),
            item.pack_cost(),
            quantity
        );
    }
}

fn print_upgrades(game: &CarWash) {
    println!("upgrade catalog:");
    for kind in UpgradeKind::ALL {
        let owned = game
            .purchased_upgrades()
            .iter()
            .filter(|purchased| **purchased == kind)
            .count();
        println!(
            "  {}. {:<12} {:>6.2} EUR  {}{}",
            kind.id(),
            kind.name(),
            kind.cost(),
            kind.description(),
            if owned > 0 {
                format!(" (owned x{owned})")
            } else {
                String::new()
            }
        );
    }
}

fn print_reports(game: &CarWash) {
    if game.reports().is_empty() {
        println!("no finished days yet.");
        return;
    }
    for report in game.reports() {
        println!("{report}");
    }
}

fn print_stats(game: &CarWash) {
    let stats = Statistics::new(game.reports());
    if stats.days() == 0 {
        println!("no finished days yet.");
        return;
    }
    println!("over {} day(s):", stats.days());
    println!(
        "  cars served: {} ({:.1}/day), lost: {}",
        stats.total_cars(),
        stats.avg_cars_per_day(),
        stats.total_lost()
    );
    println!(
        "  revenue: {:.2} EUR ({:.2}/day)",
        stats.total_revenue(),
        stats.avg_revenue_per_day()
    );
    println!(
        "  satisfaction: {:.2} / 5.0",
        stats.avg_satisfaction_weighted()
    );
    if let Some(best) = stats.best_day_by_revenue() {
        println!("  best day: {} ({:.2} EUR)", best.day(), best.revenue());
    }
    for (name, sales) in stats.top_services_by_revenue(3) {
        println!(
            "  top service {}: {} cars, {:.2} EUR",
            name, sales.cars, sales.revenue
        );
    }
}
