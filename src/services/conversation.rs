use anyhow::Context;
use chrono::{Duration, NaiveDate, Utc};

use crate::models::{
    Caregiver, CheckoutPayload, Conversation, InteractiveSelection, Message, Package,
    Qualification, QuickReply, ServiceType, Step, UserSelection, CHECKOUT_ITEM_TYPE,
};
use crate::services::catalog::Catalog;
use crate::services::{pricing, timeslots};

/// Interactive caregiver lists show at most this many candidates.
pub const MAX_CAREGIVER_CANDIDATES: usize = 6;

#[derive(Debug, Clone)]
pub struct TransitionOutcome {
    pub reply: Message,
    pub checkout: Option<CheckoutPayload>,
}

impl TransitionOutcome {
    fn reply(reply: Message) -> Self {
        Self {
            reply,
            checkout: None,
        }
    }
}

/// Fresh session at `select_service_type` with the greeting prompt.
pub fn new_conversation(id: &str, persona: &str) -> Conversation {
    let mut conv = base_conversation(id, persona);
    conv.messages.push(service_type_prompt(
        "Hello! I can help you book elder-care services. What type of service do you need?",
    ));
    conv
}

/// Direct-entry shortcut for sessions arriving from a caregiver detail view:
/// service type, qualification and caregiver are already known, so the flow
/// starts at `select_package`. This is the only state-skipping path.
pub fn with_preselected_caregiver(
    id: &str,
    persona: &str,
    caregiver: &Caregiver,
    service_type: ServiceType,
    qualification: Qualification,
    catalog: &dyn Catalog,
) -> Conversation {
    let mut conv = base_conversation(id, persona);
    conv.step = Step::SelectPackage;
    conv.service_type = Some(service_type);
    conv.qualification = Some(qualification);
    conv.caregiver_id = Some(caregiver.id.clone());
    conv.messages.push(
        Message::assistant(format!(
            "Welcome! You've chosen {} ({}). Which service package would you like?",
            caregiver.name,
            caregiver.qualification.as_str(),
        ))
        .with_selection(InteractiveSelection::Packages(catalog.service_packages())),
    );
    conv
}

/// Advance the conversation by one user selection. Deterministic for a given
/// state, input and catalog; the caller owns delivery of any checkout
/// payload in the outcome. Returns an error (leaving the caller's stored
/// state untouched) when the catalog is missing an entity the flow refers
/// to.
pub fn transition(
    mut conv: Conversation,
    selection: UserSelection,
    catalog: &dyn Catalog,
    today: NaiveDate,
) -> anyhow::Result<(Conversation, TransitionOutcome)> {
    conv.messages.push(Message::user(selection_echo(&selection, catalog)));

    // Exhaustive over Step on purpose: a new step must be handled here.
    let outcome = match conv.step {
        Step::SelectServiceType => match selection {
            UserSelection::ServiceType(service_type) => {
                conv.service_type = Some(service_type);
                conv.step = Step::SelectQualification;
                TransitionOutcome::reply(qualification_prompt(service_type))
            }
            _ => reset(&mut conv),
        },

        Step::SelectQualification => match selection {
            UserSelection::Qualification(qualification) => {
                let service_type = conv
                    .service_type
                    .context("qualification selected before service type")?;
                conv.qualification = Some(qualification);

                let mut candidates: Vec<Caregiver> = catalog
                    .caregivers_by_service_type(service_type)
                    .into_iter()
                    .filter(|c| c.qualification.normalized() == qualification.normalized())
                    .collect();

                if candidates.is_empty() {
                    tracing::info!(
                        service_type = service_type.as_str(),
                        qualification = qualification.as_str(),
                        "no caregivers match the requested combination"
                    );
                    conv.clear_selections();
                    conv.step = Step::SelectServiceType;
                    TransitionOutcome::reply(service_type_prompt(
                        "No caregivers are available for that combination yet. Let's try a different service type.",
                    ))
                } else {
                    candidates.truncate(MAX_CAREGIVER_CANDIDATES);
                    conv.step = Step::SelectCaregiver;
                    TransitionOutcome::reply(
                        Message::assistant(
                            "Here are caregivers matching your needs. Tap one to continue.",
                        )
                        .with_selection(InteractiveSelection::Caregivers(candidates)),
                    )
                }
            }
            _ => reset(&mut conv),
        },

        Step::SelectCaregiver => match selection {
            UserSelection::Caregiver(id) => {
                let caregiver = catalog
                    .caregiver_by_id(&id)
                    .with_context(|| format!("caregiver {id} not found in catalog"))?;
                conv.caregiver_id = Some(caregiver.id);
                conv.step = Step::SelectPackage;
                TransitionOutcome::reply(
                    Message::assistant("Great choice. Which service package works for you?")
                        .with_selection(InteractiveSelection::Packages(catalog.service_packages())),
                )
            }
            _ => reset(&mut conv),
        },

        Step::SelectPackage => match selection {
            UserSelection::Package(id) => {
                let package = catalog
                    .package_by_id(&id)
                    .with_context(|| format!("package {id} not found in catalog"))?;
                conv.package_id = Some(package.id);
                conv.step = Step::SelectDate;
                TransitionOutcome::reply(
                    Message::assistant("When should the service start?")
                        .with_quick_replies(date_options(today)),
                )
            }
            _ => reset(&mut conv),
        },

        Step::SelectDate => match selection {
            UserSelection::Date(date) => match NaiveDate::parse_from_str(&date, "%Y-%m-%d") {
                Ok(start) => {
                    let package_id = conv
                        .package_id
                        .clone()
                        .context("date selected before package")?;
                    conv.service_date = Some(date);
                    conv.step = Step::SelectTime;
                    let replies = timeslots::options_for(&package_id, start)
                        .into_iter()
                        .map(|slot| QuickReply::new(slot.label, slot.value))
                        .collect();
                    TransitionOutcome::reply(
                        Message::assistant("Which time works best?").with_quick_replies(replies),
                    )
                }
                Err(_) => reset(&mut conv),
            },
            _ => reset(&mut conv),
        },

        Step::SelectTime => match selection {
            UserSelection::Time(time) => {
                let caregiver = resolve_caregiver(&conv, catalog)?;
                let package = resolve_package(&conv, catalog)?;
                let service_type = conv
                    .service_type
                    .context("time selected before service type")?;
                conv.service_time = Some(time.clone());
                conv.step = Step::ConfirmOrder;

                let price_display = match pricing::price_tier(&package, caregiver.qualification) {
                    Some(tier) => format!("¥{}/{}", tier.price, tier.unit),
                    None => {
                        warn_missing_tier(&package, caregiver.qualification);
                        "¥0".to_string()
                    }
                };
                let summary = format!(
                    "Please confirm your booking:\nService: {}\nCaregiver: {} ({})\nPackage: {}\nDate: {}\nTime: {}\nPrice: {}",
                    service_type.label(),
                    caregiver.name,
                    caregiver.qualification.as_str(),
                    package.name,
                    conv.service_date.as_deref().unwrap_or("-"),
                    time,
                    price_display,
                );
                TransitionOutcome::reply(Message::assistant(summary).with_quick_replies(vec![
                    QuickReply::new("Confirm", "confirm"),
                    QuickReply::new("Start over", "restart"),
                ]))
            }
            _ => reset(&mut conv),
        },

        Step::ConfirmOrder => match selection {
            UserSelection::Confirm => {
                let caregiver = resolve_caregiver(&conv, catalog)?;
                let package = resolve_package(&conv, catalog)?;
                let service_type = conv.service_type.context("confirm without service type")?;
                let price = pricing::price_tier(&package, caregiver.qualification)
                    .map(|tier| tier.price)
                    .unwrap_or_else(|| {
                        warn_missing_tier(&package, caregiver.qualification);
                        0
                    });

                let payload = CheckoutPayload {
                    item_type: CHECKOUT_ITEM_TYPE.to_string(),
                    caregiver_id: caregiver.id.clone(),
                    package_id: package.id.clone(),
                    service_type,
                    item_name: format!(
                        "{}-{}-{}({})",
                        service_type.label(),
                        package.name,
                        caregiver.name,
                        caregiver.qualification.as_str(),
                    ),
                    price,
                    service_date: conv
                        .service_date
                        .clone()
                        .context("confirm without service date")?,
                    service_time: conv
                        .service_time
                        .clone()
                        .context("confirm without service time")?,
                };
                conv.step = Step::Completed;
                TransitionOutcome {
                    reply: Message::assistant(
                        "Your booking is confirmed and has been sent to checkout. Thank you!",
                    ),
                    checkout: Some(payload),
                }
            }
            UserSelection::Restart => {
                conv.clear_selections();
                conv.step = Step::SelectServiceType;
                TransitionOutcome::reply(service_type_prompt(
                    "No problem, let's start over. What type of service do you need?",
                ))
            }
            _ => reset(&mut conv),
        },

        Step::Completed => reset(&mut conv),
    };

    conv.messages.push(outcome.reply.clone());
    conv.last_activity = Utc::now().naive_utc();
    Ok((conv, outcome))
}

fn base_conversation(id: &str, persona: &str) -> Conversation {
    let now = Utc::now().naive_utc();
    Conversation {
        id: id.to_string(),
        step: Step::SelectServiceType,
        service_type: None,
        qualification: None,
        caregiver_id: None,
        package_id: None,
        service_date: None,
        service_time: None,
        messages: vec![],
        persona: persona.to_string(),
        created_at: now,
        last_activity: now,
    }
}

// Total reset: no partial state survives an input the current step does not
// expect.
fn reset(conv: &mut Conversation) -> TransitionOutcome {
    tracing::warn!(
        step = conv.step.as_str(),
        "unexpected input for current step, resetting conversation"
    );
    conv.clear_selections();
    conv.step = Step::SelectServiceType;
    TransitionOutcome::reply(service_type_prompt(
        "Sorry, I didn't catch that. Let's start from the beginning — what type of service do you need?",
    ))
}

fn service_type_prompt(lead: &str) -> Message {
    Message::assistant(lead).with_quick_replies(vec![
        QuickReply::new(ServiceType::ElderlyCare.label(), ServiceType::ElderlyCare.as_str()),
        QuickReply::new(ServiceType::Escort.label(), ServiceType::Escort.as_str()),
        QuickReply::new(ServiceType::MedicalStaff.label(), ServiceType::MedicalStaff.as_str()),
    ])
}

fn qualification_prompt(service_type: ServiceType) -> Message {
    Message::assistant(format!(
        "{} it is. What qualification level do you need?",
        service_type.label()
    ))
    .with_quick_replies(vec![
        QuickReply::new("Personal Care Worker (PCW)", Qualification::Pcw.as_str()),
        QuickReply::new("Health Worker (HW)", Qualification::Hw.as_str()),
        QuickReply::new("Registered Nurse (RN)", Qualification::Rn.as_str()),
    ])
}

fn date_options(today: NaiveDate) -> Vec<QuickReply> {
    (0..3)
        .map(|offset| {
            let value = (today + Duration::days(offset)).format("%Y-%m-%d").to_string();
            let label = match offset {
                0 => format!("Today ({value})"),
                1 => format!("Tomorrow ({value})"),
                _ => value.clone(),
            };
            QuickReply::new(label, value)
        })
        .collect()
}

fn selection_echo(selection: &UserSelection, catalog: &dyn Catalog) -> String {
    match selection {
        UserSelection::ServiceType(st) => st.label().to_string(),
        UserSelection::Qualification(q) => q.as_str().to_string(),
        UserSelection::Caregiver(id) => catalog
            .caregiver_by_id(id)
            .map(|c| c.name)
            .unwrap_or_else(|| id.clone()),
        UserSelection::Package(id) => catalog
            .package_by_id(id)
            .map(|p| p.name)
            .unwrap_or_else(|| id.clone()),
        UserSelection::Date(d) => d.clone(),
        UserSelection::Time(t) => t.clone(),
        UserSelection::Confirm => "Confirm".to_string(),
        UserSelection::Restart => "Start over".to_string(),
    }
}

fn resolve_caregiver(conv: &Conversation, catalog: &dyn Catalog) -> anyhow::Result<Caregiver> {
    let id = conv.caregiver_id.as_deref().context("no caregiver selected")?;
    catalog
        .caregiver_by_id(id)
        .with_context(|| format!("caregiver {id} not found in catalog"))
}

fn resolve_package(conv: &Conversation, catalog: &dyn Catalog) -> anyhow::Result<Package> {
    let id = conv.package_id.as_deref().context("no package selected")?;
    catalog
        .package_by_id(id)
        .with_context(|| format!("package {id} not found in catalog"))
}

fn warn_missing_tier(package: &Package, qualification: Qualification) {
    tracing::warn!(
        package_id = %package.id,
        qualification = qualification.as_str(),
        "no matching price tier, defaulting price to 0"
    );
}
