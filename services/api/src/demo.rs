use crate::infra::{load_catalog, InMemoryAdvisingStore};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use study_compass::advising::{
    filter_and_classify, validate_profile, AdvisingError, AdvisingService, BudgetRange,
    EducationLevel, FundingPlan, GreStatus, IeltsStatus, IntendedDegree, NewShortlistEntry,
    Profile, ProfileStrength, Recommendations, SopStatus, StudentId, Tier, TodoFilter,
    UniversityId,
};
use study_compass::error::AppError;

#[derive(Args, Debug)]
pub(crate) struct RecommendArgs {
    /// Path to a profile JSON document (camelCase fields)
    #[arg(long)]
    pub(crate) profile: PathBuf,
    /// Optional catalog CSV export; the bundled sample is used otherwise
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Optional catalog CSV export; the bundled sample is used otherwise
    #[arg(long)]
    pub(crate) catalog_csv: Option<PathBuf>,
    /// Student identifier used for the walkthrough
    #[arg(long, default_value = "demo-student")]
    pub(crate) student: String,
}

pub(crate) fn run_recommend(args: RecommendArgs) -> Result<(), AppError> {
    let RecommendArgs {
        profile,
        catalog_csv,
    } = args;

    let raw = std::fs::read_to_string(&profile)?;
    let profile = parse_profile(&raw)?;
    let catalog = load_catalog(catalog_csv.as_deref())?;

    let recommendations = filter_and_classify(Some(&profile), &catalog)?;
    render_recommendations(&recommendations);
    render_strength(&ProfileStrength::assess(&profile));
    Ok(())
}

fn parse_profile(raw: &str) -> Result<Profile, AppError> {
    let profile: Profile = serde_json::from_str(raw)
        .map_err(|err| AppError::InvalidInput(format!("profile JSON is malformed ({err})")))?;
    validate_profile(&profile).map_err(AdvisingError::from)?;
    Ok(profile)
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        catalog_csv,
        student,
    } = args;

    let catalog = load_catalog(catalog_csv.as_deref())?;
    println!("Study Compass demo ({} universities in catalog)", catalog.len());

    let store = Arc::new(InMemoryAdvisingStore::with_catalog(catalog));
    let service = AdvisingService::new(store);
    let student = StudentId(student);

    let record = service.submit_profile(&student, demo_profile())?;
    println!(
        "\nProfile submitted for {} -> stage {} ({})",
        student.0,
        record.stage.number(),
        record.stage.label()
    );
    render_strength(&service.profile_strength(&student)?);

    let recommendations = service.recommend(&student)?;
    render_recommendations(&recommendations);

    let Some(pick) = recommendations
        .target
        .first()
        .or_else(|| recommendations.iter().next())
    else {
        println!("\nNo universities matched the demo profile; nothing to shortlist.");
        return Ok(());
    };

    let entry = service.add_to_shortlist(
        &student,
        NewShortlistEntry {
            university_id: pick.university.id.clone(),
            category: tier_of(&recommendations, &pick.university.id),
            ai_reason: Some(pick.fit_reason.to_string()),
            risk_level: Some(pick.risk_level),
        },
    )?;
    println!(
        "\nShortlisted {} as {}",
        pick.university.name,
        entry.category.label()
    );

    let outcome = service.lock(&student, &entry.id)?;
    println!(
        "Locked {} -> stage {} ({}), {} tasks created:",
        pick.university.name,
        outcome.stage.number(),
        outcome.stage.label(),
        outcome.todos_created.len()
    );
    for todo in service.todos(&student, &TodoFilter::default())? {
        println!(
            "  - [{:?}/{:?}] {}",
            todo.category, todo.priority, todo.task
        );
    }

    match service.remove_from_shortlist(&student, &entry.id) {
        Ok(()) => println!("Unexpectedly removed a locked university"),
        Err(err) => println!("Removal attempt while locked: {err}"),
    }

    let unlocked = service.unlock(&student, &entry.id)?;
    println!(
        "Unlocked {} -> stage {} ({})",
        pick.university.name,
        unlocked.stage.number(),
        unlocked.stage.label()
    );
    println!("  {}", unlocked.warning);

    Ok(())
}

fn tier_of(recommendations: &Recommendations, id: &UniversityId) -> Tier {
    [Tier::Dream, Tier::Target, Tier::Safe]
        .into_iter()
        .find(|tier| {
            recommendations
                .tier(*tier)
                .iter()
                .any(|item| &item.university.id == id)
        })
        .unwrap_or(Tier::Target)
}

fn render_recommendations(recommendations: &Recommendations) {
    println!("\nRecommendations");
    for tier in [Tier::Dream, Tier::Target, Tier::Safe] {
        let items = recommendations.tier(tier);
        println!("{} ({}):", tier.label(), items.len());
        for item in items {
            let ranking = item
                .university
                .ranking
                .map(|rank| format!("#{rank}"))
                .unwrap_or_else(|| "unranked".to_string());
            println!(
                "  - {} [{}] {} | ${}/yr | risk {:?}",
                item.university.name,
                item.university.country,
                ranking,
                item.university.tuition_per_year,
                item.risk_level
            );
        }
    }
}

fn render_strength(strength: &ProfileStrength) {
    println!(
        "Profile strength {}/100 (academics {:?}, exams {:?}, SOP {:?})",
        strength.overall, strength.academics, strength.exams, strength.sop
    );
}

fn demo_profile() -> Profile {
    Profile {
        education_level: EducationLevel::Bachelors,
        degree: "B.Tech Computer Engineering".to_string(),
        graduation_year: 2024,
        gpa: Some(8.1),
        intended_degree: IntendedDegree::Masters,
        field_of_study: "Computer Science".to_string(),
        target_intake: "Fall 2026".to_string(),
        preferred_countries: vec!["DE".to_string(), "CA".to_string(), "IE".to_string()],
        budget_range: BudgetRange::From20kTo40k,
        funding_plan: FundingPlan::Mixed,
        ielts_status: IeltsStatus::Completed,
        ielts_score: Some(7.5),
        gre_status: GreStatus::NotRequired,
        gre_score: None,
        sop_status: SopStatus::Draft,
    }
}
