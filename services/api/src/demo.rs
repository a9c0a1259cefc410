use crate::infra::{open_store, service_over, MemoryService};
use clap::Args;
use serde::Serialize;
use vendor_intake::config::{AppConfig, StoreBackend};
use vendor_intake::error::AppError;
use vendor_intake::workflows::onboarding::{
    Decision, FieldPath, FormWizard, InMemoryStore, OnboardingError, Principal, RepositoryError,
    RequestRepository, SubmitOutcome, User, UserDirectory, VendorRepository, VendorRequest,
};

#[derive(Args, Debug)]
pub(crate) struct DemoArgs {
    /// Vendor name entered on the first wizard step
    #[arg(long, default_value = "Northwind Formwork")]
    pub(crate) vendor_name: String,
    /// Comma separated categories for the vendor
    #[arg(long, default_value = "Formwork, Shoring")]
    pub(crate) categories: String,
    /// Reject the request instead of approving it
    #[arg(long)]
    pub(crate) reject: bool,
    /// Stop after submission and leave the request pending
    #[arg(long)]
    pub(crate) skip_review: bool,
}

impl Default for DemoArgs {
    fn default() -> Self {
        Self {
            vendor_name: "Northwind Formwork".to_string(),
            categories: "Formwork, Shoring".to_string(),
            reject: false,
            skip_review: false,
        }
    }
}

fn print_json<T: Serialize>(label: &str, value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{label}:\n{rendered}"),
        Err(err) => println!("{label}: unable to render ({err})"),
    }
}

fn seeded_user(store: &InMemoryStore, email: &str) -> Result<User, AppError> {
    UserDirectory::find_by_email(store, email)?.ok_or(AppError::Seed(RepositoryError::NotFound))
}

/// Seed the configured store and print what it now holds.
pub(crate) fn run_seed() -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let backend = config.store.require_backend()?;
    let store = open_store(backend, true)?;

    println!("Seeded {:?} store", backend);
    print_json("Users", &UserDirectory::list(&store)?);
    print_json("Vendors", &VendorRepository::list(&store)?);
    print_json("Requests", &RequestRepository::list_all(&store)?);
    Ok(())
}

async fn submit_through_wizard(
    wizard: &mut FormWizard,
    service: &MemoryService,
    requester: &User,
    args: &DemoArgs,
) -> SubmitOutcome<VendorRequest> {
    wizard.set_field(FieldPath::Name, args.vendor_name.as_str());
    wizard.set_field(FieldPath::Categories, args.categories.as_str());
    wizard.set_field(FieldPath::Website, "https://northwind-formwork.example");
    for step in wizard.steps() {
        println!("- step {}: {}", step.id, step.title);
        if !wizard.is_last_step() && !wizard.go_next() {
            println!("  blocked: {:?}", wizard.errors());
            break;
        }
    }
    wizard.set_field(
        FieldPath::Justification,
        "Reusable formwork for the riverside podium slabs",
    );

    let service = service.clone();
    let principal = Principal::from(requester);
    wizard
        .submit(|draft| async move { service.submit(&principal, draft) })
        .await
}

/// Walk one request from the intake wizard through an admin decision.
pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    println!("Vendor onboarding demo");
    let store = open_store(&StoreBackend::Memory, true)?;
    let service = service_over(&store);
    let buyer = seeded_user(&store, "hana@northbuild.example")?;
    let admin = seeded_user(&store, "ines@northbuild.example")?;

    let mut wizard = FormWizard::new();
    let request = match submit_through_wizard(&mut wizard, &service, &buyer, &args).await {
        SubmitOutcome::Submitted(request) => request,
        SubmitOutcome::Invalid => {
            println!("Submission blocked: {:?}", wizard.errors());
            return Ok(());
        }
        other => {
            println!("Submission failed: {other:?}");
            return Ok(());
        }
    };
    print_json("Submitted request", &request);

    if args.skip_review {
        return Ok(());
    }

    let decision = if args.reject {
        Decision::Rejected
    } else {
        Decision::Approved
    };
    let decided = match service.decide(
        &Principal::from(&admin),
        &request.id,
        decision,
        Some("Reviewed during the CLI demo".to_string()),
    ) {
        Ok(decided) => decided,
        Err(err @ OnboardingError::Conflict { .. }) => {
            println!("Decision refused: {err}");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };
    print_json("Decided request", &decided);
    print_json("Vendor catalog", &service.list_vendors(&Principal::from(&buyer))?);
    Ok(())
}
