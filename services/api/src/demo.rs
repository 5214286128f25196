use crate::infra::{parse_entry_spec, InMemoryNoticePublisher, InMemorySubjectRepository};
use clap::Args;
use passmark::error::AppError;
use passmark::grading::import::GradeSheetImporter;
use passmark::grading::subjects::{
    ApprovalCalculator, ApprovalSettings, EvaluationResult, GradeLedger, SubjectName,
    SubjectService,
};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct RequiredArgs {
    /// Graded entry as GRADE:WEIGHT, repeatable (e.g. --entry 4.5:20)
    #[arg(long = "entry", value_parser = parse_entry_spec)]
    pub(crate) entries: Vec<(f64, f64)>,
    /// Grade-sheet CSV to load instead of inline entries
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Minimum final average that counts as approved
    #[arg(long, default_value_t = 3.0)]
    pub(crate) min_accept: f64,
    /// Lowest grade on the scale
    #[arg(long, default_value_t = 0.0)]
    pub(crate) min_grade: f64,
    /// Highest grade on the scale
    #[arg(long, default_value_t = 5.0)]
    pub(crate) max_grade: f64,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Optional grade-sheet CSV to hydrate the demo subject
    #[arg(long)]
    pub(crate) csv: Option<PathBuf>,
    /// Skip the subject-service portion of the demo
    #[arg(long)]
    pub(crate) skip_service: bool,
}

pub(crate) fn run_required_report(args: RequiredArgs) -> Result<(), AppError> {
    let RequiredArgs {
        entries,
        csv,
        min_accept,
        min_grade,
        max_grade,
    } = args;

    let settings = ApprovalSettings::new(min_accept, min_grade, max_grade);

    let ledger = match csv {
        Some(path) => GradeSheetImporter::from_path(path, settings)?,
        None => {
            let mut ledger = GradeLedger::new(settings);
            for (grade, weight) in &entries {
                if let Err(err) = ledger.add_entry(*grade, *weight) {
                    println!("Entry {grade}:{weight} rejected: {err}");
                    return Ok(());
                }
            }
            ledger
        }
    };

    match ApprovalCalculator::new(settings).evaluate(&ledger) {
        Ok(result) => render_projection(&result),
        Err(err) => println!("Evaluation unavailable: {err}"),
    }

    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { csv, skip_service } = args;

    println!("Grade approval demo");
    let settings = ApprovalSettings::default();

    let ledger = match csv {
        Some(path) => GradeSheetImporter::from_path(path, settings)?,
        None => {
            let mut ledger = GradeLedger::new(settings);
            for (grade, weight) in [(4.5, 20.0), (3.0, 30.0), (5.0, 50.0)] {
                if let Err(err) = ledger.add_entry(grade, weight) {
                    println!("  Demo entry rejected: {err}");
                    return Ok(());
                }
            }
            ledger
        }
    };

    match ApprovalCalculator::new(settings).evaluate(&ledger) {
        Ok(result) => render_projection(&result),
        Err(err) => println!("Evaluation unavailable: {err}"),
    }

    if skip_service {
        return Ok(());
    }

    println!("\nSubject workflow demo");
    let repository = Arc::new(InMemorySubjectRepository::default());
    let notices = Arc::new(InMemoryNoticePublisher::default());
    let service = Arc::new(SubjectService::new(
        repository.clone(),
        notices.clone(),
        settings,
    ));

    let name = SubjectName("linear algebra".to_string());
    let record = match service.create(name.clone()) {
        Ok(record) => record,
        Err(err) => {
            println!("  Subject rejected: {err}");
            return Ok(());
        }
    };
    println!(
        "- Opened subject '{}' -> status {}",
        record.name.0,
        record.status.label()
    );

    let entries: Vec<(f64, f64)> = ledger
        .entries()
        .iter()
        .map(|entry| (entry.grade, entry.weight_percent))
        .collect();
    for (grade, weight) in entries {
        if let Err(err) = service.add_grade(&name, grade, weight) {
            println!("  Grade {grade} at {weight}% rejected: {err}");
            return Ok(());
        }
    }

    let result = match service.calculate(&name) {
        Ok(result) => result,
        Err(err) => {
            println!("  Calculation unavailable: {err}");
            return Ok(());
        }
    };
    println!(
        "  Calculation: {} (status {})",
        result.summary(),
        result.final_status.label()
    );

    let stored_view = match service.get(&name) {
        Ok(record) => record.status_view(),
        Err(err) => {
            println!("  Repository unavailable: {err}");
            return Ok(());
        }
    };
    match serde_json::to_string_pretty(&stored_view) {
        Ok(json) => println!("  Public status payload:\n{json}"),
        Err(err) => println!("  Public status payload unavailable: {err}"),
    }

    let events = notices.events();
    if events.is_empty() {
        println!("  Outbound notices: none dispatched");
    } else {
        println!("  Outbound notices:");
        for notice in events {
            println!("    - template={} -> {}", notice.template, notice.subject.0);
        }
    }

    Ok(())
}

fn render_projection(result: &EvaluationResult) {
    println!("Weighted grade projection");
    println!(
        "- current average {} over the entered {}%",
        result.current_average, result.total_percent_entered
    );
    println!("- {}", result.summary());
    println!("- status: {}", result.final_status.label());
    println!("- contributions:");
    for contribution in &result.contributions {
        println!(
            "    {} at {}% -> {:.1} points",
            contribution.grade, contribution.weight_percent, contribution.points
        );
    }
}
