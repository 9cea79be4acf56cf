use crate::infra::{sample_fleet, SampleVisit, SAMPLE_VISITS};
use chrono::{Days, Local, NaiveDate};
use clap::Args;
use oficina_vital::config::AppConfig;
use oficina_vital::error::AppError;
use oficina_vital::workshop::analytics::views::{AnalyticsOverview, FinancialReport};
use oficina_vital::workshop::{
    adaptive_checklist, items_for_mileage, read_fleet_file, ChecklistFilter, InMemoryRegistry,
    ItemStatus, Plate, ReportPeriod, StatusUpdate, ValidationPolicy, WorkshopAnalytics,
    WorkshopError, WorkshopService, BASELINE_ITEMS,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Optional fleet CSV (plate,brand,model,year,displacement_cc,category) registered before the sample visits.
    #[arg(long)]
    pub(crate) fleet_csv: Option<PathBuf>,
    /// Financial report period: day, week, month or year.
    #[arg(long, default_value = "month")]
    pub(crate) period: ReportPeriod,
    /// Reference date for the report and sample visits (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) reference: Option<NaiveDate>,
    /// Mileage to predict the estimated cost for.
    #[arg(long, default_value_t = 40_000)]
    pub(crate) future_mileage: u64,
}

#[derive(Args, Debug)]
pub(crate) struct TemplateArgs {
    /// Odometer reading in km.
    #[arg(long)]
    pub(crate) mileage: u64,
}

pub(crate) fn print_template(args: &TemplateArgs) {
    let extra = items_for_mileage(args.mileage);
    println!(
        "Inspection at {} km: {} baseline item(s) plus {} due by mileage",
        args.mileage,
        BASELINE_ITEMS.len(),
        extra.len()
    );
    for template in BASELINE_ITEMS.iter() {
        println!("  [{}] {}", template.category, template.name);
    }
    if !extra.is_empty() {
        println!("Due at this mileage");
        for template in &extra {
            println!("  [{}] {}", template.category, template.name);
        }
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        fleet_csv,
        period,
        reference,
        future_mileage,
    } = args;

    let config = AppConfig::load()?;
    let reference = reference.unwrap_or_else(|| Local::now().date_naive());
    let service = WorkshopService::new(
        Arc::new(InMemoryRegistry::new()),
        ValidationPolicy::from(&config.validation),
    );

    println!("Oficina Vital demo (reference date {reference})");

    let imported = match fleet_csv {
        Some(path) => {
            let fleet = read_fleet_file(&path)?;
            let count = fleet.len();
            for vehicle in fleet {
                service.register_vehicle(vehicle)?;
            }
            println!("- Imported {count} motorcycle(s) from {}", path.display());
            count
        }
        None => 0,
    };

    let fleet = sample_fleet().map_err(WorkshopError::from)?;
    for vehicle in fleet {
        service.register_vehicle(vehicle)?;
    }
    println!(
        "- Fleet: {} motorcycle(s) registered ({imported} from CSV)",
        service.vehicles()?.len()
    );

    println!("\nRegistering sample visits");
    for visit in SAMPLE_VISITS {
        if let Err(err) = register_visit(&service, visit, reference) {
            println!("  {} at {} km rejected: {err}", visit.plate, visit.mileage);
        }
    }

    let checklists = service.checklists(&ChecklistFilter::default())?;
    let analytics = WorkshopAnalytics::new(&checklists);
    render_overview(&analytics.overview(Some(future_mileage)));

    println!("\nCost by category");
    for entry in analytics.category_breakdown(&service.vehicles()?) {
        if entry.checklists == 0 && entry.vehicles == 0 {
            continue;
        }
        println!(
            "  - {}: {} vehicle(s), {} checklist(s), R$ {:.2} estimated",
            entry.category_label, entry.vehicles, entry.checklists, entry.costs.total
        );
    }

    render_financial_report(&analytics.financial_report_for_period(period, Some(reference)));
    Ok(())
}

fn register_visit(
    service: &WorkshopService<InMemoryRegistry>,
    visit: &SampleVisit,
    reference: NaiveDate,
) -> Result<(), WorkshopError> {
    let plate = Plate::parse(visit.plate)?;
    let vehicle = service.vehicle(&plate)?;
    let date = reference.checked_sub_days(Days::new(visit.days_ago));
    let mut checklist = adaptive_checklist(vehicle, visit.mileage, date)?;

    for (name, cost) in visit.replacements {
        let index = checklist.items().iter().position(|item| item.name() == *name);
        if let Some(index) = index {
            checklist.update_item(index, Some(ItemStatus::NeedsReplacement), Some(*cost))?;
        }
    }

    let registration = service.register_checklist(checklist)?;
    println!(
        "  {} at {} km -> checklist {}",
        visit.plate, visit.mileage, registration.id
    );
    for advisory in &registration.advisories {
        println!("    advisory: {advisory}");
    }

    service.update_status(
        registration.id,
        &StatusUpdate {
            finalized: Some(visit.finalized),
            paid: Some(visit.paid),
            real_cost: visit.real_cost,
        },
    )?;
    Ok(())
}

fn render_overview(overview: &AnalyticsOverview) {
    println!("\nAnalytics overview ({} checklists)", overview.checklists);
    println!(
        "- Estimated costs: total R$ {:.2} | mean R$ {:.2} | max R$ {:.2} | min R$ {:.2}",
        overview.costs.total, overview.costs.mean, overview.costs.max, overview.costs.min
    );
    println!(
        "- Real costs: {} recorded | total R$ {:.2} | mean R$ {:.2}",
        overview.actual_costs.count, overview.actual_costs.total, overview.actual_costs.mean
    );
    let distribution = &overview.status_distribution;
    println!(
        "- Items: {} completed | {} pending | {} need replacement | {} ignored",
        distribution.completed,
        distribution.pending,
        distribution.needs_replacement,
        distribution.ignored
    );

    match (&overview.cost_model, overview.future_mileage, overview.predicted_cost) {
        (Some(model), Some(mileage), Some(predicted)) => println!(
            "- Cost trend: {:.4} per km + {:.2} -> R$ {:.2} expected at {} km",
            model.slope, model.intercept, predicted, mileage
        ),
        _ => println!("- Cost trend: not enough distinct mileages to fit a model"),
    }

    println!("History");
    for point in &overview.history {
        println!(
            "  {} {:<28} {:>7} km  R$ {:>8.2}{}",
            point.formatted_date,
            point.vehicle,
            point.mileage,
            point.estimated_cost,
            if point.paid { "  paid" } else { "" }
        );
    }
}

fn render_financial_report(report: &FinancialReport) {
    let period = report.period.map_or("Custom", ReportPeriod::label);
    println!("\nFinancial report ({period})");
    if let (Some(start), Some(end)) = (report.start, report.end) {
        println!("- Window: {start} -> {end}");
    }
    println!(
        "- Revenue R$ {:.2} | cost R$ {:.2} | profit R$ {:.2}",
        report.revenue, report.cost, report.profit
    );
    println!(
        "- {} service(s) across {} vehicle(s): {} paid, {} unpaid | average ticket R$ {:.2}",
        report.services, report.vehicles, report.paid, report.unpaid, report.average_ticket
    );
}
