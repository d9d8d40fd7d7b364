use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;
use transit_catalogue::application::TransportCatalogue;
use transit_catalogue::domain::{BusRoute, Itinerary, RouteItem};
use transit_catalogue::infrastructure::{init_tracing, read_document};

#[derive(Parser, Debug)]
#[command(version, about = "Interactive stop, bus and route lookup")]
struct Args {
    #[arg(short, long, help = "JSON document in the batch input format")]
    input: PathBuf,
    #[arg(short, long, help = "Log progress to stderr")]
    verbose: bool,
}

enum Command {
    Stop(String),
    Bus(String),
    Route(String, String),
    Help,
    Quit,
}

fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    let (keyword, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();
    match keyword {
        "stop" if !rest.is_empty() => Some(Command::Stop(rest.to_owned())),
        "bus" if !rest.is_empty() => Some(Command::Bus(rest.to_owned())),
        "route" => {
            let (from, to) = rest.split_once("->")?;
            Some(Command::Route(from.trim().to_owned(), to.trim().to_owned()))
        }
        "help" | "?" => Some(Command::Help),
        "quit" | "exit" => Some(Command::Quit),
        _ => None,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("Loading network from {:?}...", args.input);
    let file = File::open(&args.input).with_context(|| format!("opening {:?}", args.input))?;
    let document = read_document(BufReader::new(file))?;
    let catalogue =
        TransportCatalogue::new(document.base_requests, document.routing_settings.into())?;
    println!(
        "✅ Loaded {} stops and {} buses",
        catalogue.stops().len(),
        catalogue.buses().len()
    );
    print_help();

    let stdin = io::stdin();
    loop {
        print!("\n> ");
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        match parse_command(&line) {
            Some(Command::Stop(name)) => match catalogue.stop_buses(&name) {
                Some(buses) if buses.is_empty() => println!("No buses stop at {name}"),
                Some(buses) => println!("Buses at {name}: {}", buses.join(", ")),
                None => println!("❌ Stop {name} not found"),
            },
            Some(Command::Bus(name)) => match catalogue.bus_stats(&name)? {
                Some(metrics) => {
                    let kind = catalogue.buses().get(&name).map_or("", trip_kind);
                    println!("🚌 Bus {name} ({kind})");
                    println!(
                        "   Stops: {} ({} unique)",
                        metrics.stop_count, metrics.unique_stop_count
                    );
                    println!("   Road length: {:.1}m", metrics.road_length);
                    println!("   Curvature: {:.6}", metrics.curvature);
                }
                None => println!("❌ Bus {name} not found"),
            },
            Some(Command::Route(from, to)) => match catalogue.route(&from, &to) {
                Some(itinerary) => print_itinerary(&itinerary),
                None => println!("❌ No route from {from} to {to}"),
            },
            Some(Command::Help) => print_help(),
            Some(Command::Quit) => break,
            None => println!("Unrecognized command, type `help`"),
        }
    }
    Ok(())
}

fn print_help() {
    println!("Commands:");
    println!("   stop NAME          buses serving a stop");
    println!("   bus NAME           statistics of a bus line");
    println!("   route FROM -> TO   fastest itinerary");
    println!("   quit");
}

fn trip_kind(route: &BusRoute) -> &'static str {
    if route.is_round_trip {
        "round trip"
    } else {
        "out and back"
    }
}

fn print_itinerary(itinerary: &Itinerary) {
    println!("🛤️  Total time: {:.2} min", itinerary.total_time);
    for item in &itinerary.items {
        match item {
            RouteItem::Wait { stop_name, time } => println!("   wait {time:.2} min at {stop_name}"),
            RouteItem::Bus {
                bus,
                span_count,
                time,
            } => println!("   ride bus {bus} for {span_count} stops, {time:.2} min"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert!(matches!(
            parse_command("stop Tolstopaltsevo"),
            Some(Command::Stop(s)) if s == "Tolstopaltsevo"
        ));
        assert!(matches!(parse_command("bus 750 "), Some(Command::Bus(s)) if s == "750"));
        assert!(matches!(
            parse_command("route Biryulyovo Zapadnoye -> Universam"),
            Some(Command::Route(from, to)) if from == "Biryulyovo Zapadnoye" && to == "Universam"
        ));
        assert!(matches!(parse_command("quit"), Some(Command::Quit)));
        assert!(parse_command("route A B").is_none());
        assert!(parse_command("stop").is_none());
        assert!(parse_command("fly A").is_none());
    }

    #[test]
    fn describes_trip_kind() {
        let circle = BusRoute::new("14", vec!["A".into(), "B".into(), "A".into()], true);
        let line = BusRoute::new("256", vec!["A".into(), "B".into()], false);
        assert_eq!(trip_kind(&circle), "round trip");
        assert_eq!(trip_kind(&line), "out and back");
    }
}
