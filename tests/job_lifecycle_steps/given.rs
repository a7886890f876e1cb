//! Given steps for job lifecycle BDD scenarios.

use super::world::{JobLifecycleWorld, run_async};
use chrono::{NaiveDate, NaiveTime};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use rust_decimal::Decimal;
use shiftwork::{
    job::domain::{
        BarRole, ClientId, CurrencyCode, FreelancerCount, FreelancerId, JobLocation, JobSchedule,
        NewJobRequest, PayRate, PhoneRequirement, PhoneType, ServiceDetails, ServiceKind,
        YearsExperience,
    },
    lifecycle::adapters::memory::FreelancerProfile,
};

#[given("{count:u64} matching bartenders are registered")]
fn bartenders_registered(world: &mut JobLifecycleWorld, count: u64) -> Result<(), eyre::Report> {
    for value in 1..=count {
        let id = FreelancerId::new(value).wrap_err("bartender id")?;
        world.directory.register(
            FreelancerProfile::new(id, ServiceKind::Bar)
                .with_years_experience(2)
                .with_phone(PhoneType::Android),
        )?;
    }
    Ok(())
}

#[given("a bar job request needing {count:u8} freelancers")]
fn bar_job_request(world: &mut JobLifecycleWorld, count: u8) -> Result<(), eyre::Report> {
    let request = NewJobRequest {
        client: ClientId::new(5)?,
        service: ServiceDetails::Bar {
            role: BarRole::Barista,
        },
        schedule: JobSchedule::new(
            NaiveDate::from_ymd_opt(2030, 2, 20).ok_or_else(|| eyre::eyre!("invalid date"))?,
            NaiveTime::from_hms_opt(7, 0, 0).ok_or_else(|| eyre::eyre!("invalid time"))?,
            6,
        )?,
        number_of_freelancers: FreelancerCount::new(count)?,
        pay_per_hour: PayRate::new(Decimal::from(13), CurrencyCode::new("GBP")?)?,
        tips_included: true,
        years_experience: YearsExperience::OneYear,
        phone_requirement: PhoneRequirement::AnySmartphone,
        location: JobLocation::new("Unit 4, Market Hall", "M4 1HN")?,
        comments: "Breakfast service".to_owned(),
    };
    let created = run_async(world.service.create_job_request(request))
        .wrap_err("create job request for scenario")?;
    world.job_request = Some(created);
    Ok(())
}

#[given("the job request has been opened")]
fn job_request_opened(world: &mut JobLifecycleWorld) -> Result<(), eyre::Report> {
    let id = world.job_request()?.id();
    let outcome =
        run_async(world.service.open_job(id)).wrap_err("open job request in scenario setup")?;
    world.job_request = Some(outcome.job_request);
    Ok(())
}
