//! Demo project seeded into an empty data directory.

use crate::error::Result;
use crate::model::{Event, EventId, Project, ProjectId, DEFAULT_CATEGORIES};
use crate::service::workspace::create_project;
use crate::store::Storage;
use chrono::{DateTime, NaiveDate, TimeZone, Utc};

/// Name of the seeded project.
pub const DEMO_PROJECT_NAME: &str = "Vuosikello";

/// (start, end, category, name, details), all in 2025.
const SAMPLE: [((u32, u32), (u32, u32), &str, &str, &str); 9] = [
    ((1, 1), (1, 10), "Markkinointi", "Tammikuun ale", "Alennusmyynti alkaa."),
    ((7, 1), (7, 15), "Markkinointi", "Kesäkampanja", "Kesäale käynnissä."),
    ((11, 29), (11, 30), "Markkinointi", "Black Friday", "Vuoden suurin alepäivä."),
    ((3, 15), (3, 30), "Talous", "Budjetointi", "Kvartaalin budjetointi"),
    ((6, 15), (6, 30), "Talous", "Puolivuotiskatsaus", "Talouden puolivuotiskatsaus"),
    ((2, 1), (2, 15), "Henkilöstöhallinto", "Kehityskeskustelut", "Vuosittaiset kehityskeskustelut"),
    ((8, 1), (8, 15), "Henkilöstöhallinto", "Tyhy-päivä", "Työhyvinvointipäivä"),
    ((5, 1), (5, 2), "Yhteiset tapahtumat", "Kesäjuhla", "Yrityksen kesäjuhla"),
    ((12, 15), (12, 16), "Yhteiset tapahtumat", "Pikkujoulut", "Yrityksen pikkujoulut"),
];

/// The nine demo events, ids `1`..`9`, added on consecutive January days.
pub fn sample_events(project: &ProjectId) -> Vec<Event> {
    let date = |(month, day): (u32, u32)| NaiveDate::from_ymd_opt(2025, month, day);
    SAMPLE
        .iter()
        .zip(1u32..)
        .filter_map(|(&(start, end, category, name, details), n)| {
            let added: DateTime<Utc> = Utc.with_ymd_and_hms(2025, 1, n, 8, 0, 0).single()?;
            Some(Event {
                id: EventId::from(n.to_string().as_str()),
                name: name.to_string(),
                category: category.to_string(),
                start_date: date(start)?,
                end_date: date(end)?,
                details: details.to_string(),
                priority: None,
                added_date: Some(added),
                project_id: Some(project.clone()),
            })
        })
        .collect()
}

/// Create the demo project with its events if storage has no projects.
///
/// Returns the project when one was created.
///
/// # Errors
///
/// Returns an error if storage fails.
pub fn seed_if_empty<S: Storage>(storage: &S, now: DateTime<Utc>) -> Result<Option<Project>> {
    if !storage.get_projects()?.is_empty() {
        return Ok(None);
    }
    let categories = DEFAULT_CATEGORIES.iter().map(ToString::to_string).collect();
    let project = create_project(storage, DEMO_PROJECT_NAME, "Esimerkkiprojekti", categories, now)?;
    storage.save_events(&project.id, &sample_events(&project.id))?;
    log::info!(
        "event=sample_seed module=sample project={} events={}",
        project.id,
        SAMPLE.len()
    );
    Ok(Some(project))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::compute_overlap_levels;
    use crate::store::MemoryStorage;

    #[test]
    fn test_sample_events() {
        let events = sample_events(&ProjectId::from("p"));
        assert_eq!(events.len(), 9);
        assert!(events.iter().all(Event::is_well_formed));
        assert_eq!(events[2].name, "Black Friday");
        assert_eq!(events[8].id.as_str(), "9");
        // No two sample events of a category overlap.
        let levels = compute_overlap_levels(&events);
        assert_eq!(levels.max_level(), 0);
    }

    #[test]
    fn test_seed_only_once() {
        let storage = MemoryStorage::new();
        let project = seed_if_empty(&storage, Utc::now()).unwrap().unwrap();
        assert_eq!(project.name, DEMO_PROJECT_NAME);
        assert_eq!(storage.get_events(&project.id).unwrap().len(), 9);
        assert!(seed_if_empty(&storage, Utc::now()).unwrap().is_none());
    }
}
