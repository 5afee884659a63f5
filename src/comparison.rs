use tracing::{debug, warn};

use crate::distribution::fit;
use crate::gap::{relative_gap, round2};
use crate::hierarchy::Hierarchy;
use crate::models::{
    CategoryLabel, CategoryMembers, CategoryShare, ComparisonRecord, ComparisonReport,
    DistributionStats, GroupDistribution, MemberRef, Worker,
};

/// Runs the full analysis over `roster`: corporate fit, one comparison
/// record per worker in roster order, and a local fit per supervisor group.
pub fn build(roster: &[Worker]) -> ComparisonReport {
    let hierarchy = Hierarchy::new(roster);
    let scores: Vec<f64> = roster.iter().map(|worker| worker.score).collect();
    let corporate = fit(&scores);
    if !corporate.is_fitted() {
        warn!(
            workers = corporate.count,
            "corporate distribution is degenerate, categories left empty"
        );
    }

    let records: Vec<ComparisonRecord> = roster
        .iter()
        .map(|worker| compare(worker, &hierarchy, &corporate))
        .collect();

    let groups = hierarchy
        .all_supervisor_ids()
        .iter()
        .map(|supervisor_id| group_distribution(&hierarchy, supervisor_id))
        .collect();

    let breakdown = category_breakdown(&records);
    let members = category_members(records.iter().map(|record| {
        (
            record.category,
            MemberRef {
                id: record.id.clone(),
                position: record.position.clone(),
            },
        )
    }));

    ComparisonReport {
        corporate,
        records,
        breakdown,
        members,
        groups,
    }
}

fn compare(worker: &Worker, hierarchy: &Hierarchy<'_>, corporate: &DistributionStats) -> ComparisonRecord {
    let supervisor_score = hierarchy
        .resolve_supervisor(worker)
        .map(|supervisor| supervisor.score);

    ComparisonRecord {
        id: worker.id.clone(),
        name: worker.name.clone(),
        position: worker.position.clone(),
        supervisor_id: worker.supervisor_id.clone(),
        score: worker.score,
        supervisor_score,
        gap_vs_supervisor_pct: supervisor_score
            .and_then(|reference| relative_gap(worker.score, reference)),
        gap_vs_corporate_pct: relative_gap(worker.score, corporate.mean),
        category: corporate.categorize(worker.score),
    }
}

fn group_distribution(hierarchy: &Hierarchy<'_>, supervisor_id: &str) -> GroupDistribution {
    let subordinates = hierarchy.subordinates_of(supervisor_id);
    let scores: Vec<f64> = subordinates.iter().map(|worker| worker.score).collect();
    let stats = fit(&scores);

    let members = if stats.is_fitted() {
        Some(category_members(subordinates.iter().map(|worker| {
            (
                stats.categorize(worker.score),
                MemberRef {
                    id: worker.id.clone(),
                    position: worker.position.clone(),
                },
            )
        })))
    } else {
        None
    };
    debug!(
        supervisor_id,
        subordinates = stats.count,
        fitted = members.is_some(),
        "fitted group distribution"
    );

    GroupDistribution {
        supervisor_id: supervisor_id.to_string(),
        supervisor_name: hierarchy
            .worker(supervisor_id)
            .and_then(|supervisor| supervisor.name.clone()),
        subordinate_ids: subordinates.iter().map(|worker| worker.id.clone()).collect(),
        stats,
        members,
    }
}

/// Groups members under all five labels, high to low. Members without a
/// category are left out.
pub fn category_members<I>(entries: I) -> Vec<CategoryMembers>
where
    I: IntoIterator<Item = (Option<CategoryLabel>, MemberRef)>,
{
    let mut lists: Vec<CategoryMembers> = CategoryLabel::ALL
        .iter()
        .map(|&label| CategoryMembers {
            label,
            members: Vec::new(),
        })
        .collect();

    for (category, member) in entries {
        let Some(category) = category else {
            continue;
        };
        if let Some(list) = lists.iter_mut().find(|list| list.label == category) {
            list.members.push(member);
        }
    }
    lists
}

/// Share of categorized records in each label, high to low. Percentages sum
/// to 100 when at least one record has a category and are all zero otherwise.
pub fn category_breakdown(records: &[ComparisonRecord]) -> Vec<CategoryShare> {
    let total = records
        .iter()
        .filter(|record| record.category.is_some())
        .count();

    CategoryLabel::ALL
        .iter()
        .map(|&label| {
            let count = records
                .iter()
                .filter(|record| record.category == Some(label))
                .count();
            let percent = if total == 0 {
                0.0
            } else {
                round2(count as f64 / total as f64 * 100.0)
            };
            CategoryShare {
                label,
                count,
                percent,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> Vec<Worker> {
        vec![
            Worker::new("1", 100.0).with_name("Ayu").with_position("Manager"),
            Worker::new("2", 95.0)
                .with_supervisor("1")
                .with_position("Analyst"),
            Worker::new("3", 105.0)
                .with_supervisor("1")
                .with_position("Engineer"),
        ]
    }

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn three_worker_scenario() {
        let report = build(&scenario());
        assert!(close(report.corporate.mean, 100.0));
        assert!(close(report.corporate.std.unwrap(), 5.0));

        let top = &report.records[0];
        assert_eq!(top.gap_vs_corporate_pct, Some(0.0));
        assert_eq!(top.supervisor_score, None);
        assert_eq!(top.gap_vs_supervisor_pct, None);
        assert_eq!(top.category, Some(CategoryLabel::Good));

        let low = &report.records[1];
        assert_eq!(low.supervisor_score, Some(100.0));
        assert_eq!(low.gap_vs_corporate_pct, Some(-5.0));
        assert_eq!(low.gap_vs_supervisor_pct, Some(-5.0));
        assert_eq!(low.category, Some(CategoryLabel::Fair));

        let high = &report.records[2];
        assert_eq!(high.gap_vs_corporate_pct, Some(5.0));
        assert_eq!(high.gap_vs_supervisor_pct, Some(5.0));
        assert_eq!(high.category, Some(CategoryLabel::VeryGood));
    }

    #[test]
    fn records_keep_roster_order() {
        let report = build(&scenario());
        let ids: Vec<_> = report.records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn group_with_two_subordinates_is_fitted() {
        let report = build(&scenario());
        assert_eq!(report.groups.len(), 1);
        let group = report.group("1").unwrap();
        assert_eq!(group.supervisor_name.as_deref(), Some("Ayu"));
        assert_eq!(group.subordinate_ids, vec!["2", "3"]);
        assert!(close(group.stats.mean, 100.0));
        let members = group.members.as_ref().unwrap();
        let total: usize = members.iter().map(|m| m.members.len()).sum();
        assert_eq!(total, 2);
    }

    #[test]
    fn singleton_group_has_no_local_fit() {
        let mut roster = scenario();
        roster.push(Worker::new("4", 98.0).with_supervisor("3"));
        let report = build(&roster);
        let group = report.group("3").unwrap();
        assert_eq!(group.stats.count, 1);
        assert_eq!(group.stats.std, None);
        assert!(group.members.is_none());
        assert!(report.records[3].category.is_some());
        assert!(report.group("1").unwrap().members.is_some());
    }

    #[test]
    fn dangling_supervisor_is_not_an_error() {
        let mut roster = scenario();
        roster.push(Worker::new("5", 101.0).with_supervisor("404"));
        let report = build(&roster);
        let record = &report.records[3];
        assert_eq!(record.supervisor_id.as_deref(), Some("404"));
        assert_eq!(record.supervisor_score, None);
        assert_eq!(record.gap_vs_supervisor_pct, None);
        assert!(report.group("404").is_none());
    }

    #[test]
    fn self_supervised_worker_has_zero_gap() {
        let roster = vec![
            Worker::new("1", 100.0).with_supervisor("1"),
            Worker::new("2", 95.0).with_supervisor("1"),
            Worker::new("3", 105.0),
        ];
        let report = build(&roster);
        assert_eq!(report.records[0].supervisor_score, Some(100.0));
        assert_eq!(report.records[0].gap_vs_supervisor_pct, Some(0.0));
        assert_eq!(report.group("1").unwrap().subordinate_ids, vec!["1", "2"]);
    }

    #[test]
    fn zero_supervisor_score_leaves_gap_absent() {
        let roster = vec![
            Worker::new("1", 0.0),
            Worker::new("2", 50.0).with_supervisor("1"),
            Worker::new("3", 70.0),
        ];
        let report = build(&roster);
        assert_eq!(report.records[1].supervisor_score, Some(0.0));
        assert_eq!(report.records[1].gap_vs_supervisor_pct, None);
    }

    #[test]
    fn breakdown_sums_to_one_hundred() {
        let roster: Vec<Worker> = (0..37)
            .map(|i| Worker::new(i.to_string(), 80.0 + (i * 7 % 23) as f64))
            .collect();
        let report = build(&roster);
        let labels: Vec<_> = report.breakdown.iter().map(|s| s.label).collect();
        assert_eq!(labels, CategoryLabel::ALL.to_vec());
        let total: f64 = report.breakdown.iter().map(|s| s.percent).sum();
        assert!((total - 100.0).abs() < 0.05);
        let counted: usize = report.breakdown.iter().map(|s| s.count).sum();
        assert_eq!(counted, 37);
    }

    #[test]
    fn empty_roster_produces_empty_report() {
        let report = build(&[]);
        assert_eq!(report.corporate.count, 0);
        assert!(report.records.is_empty());
        assert!(report.groups.is_empty());
        assert!(report.breakdown.iter().all(|s| s.percent == 0.0));
        assert_eq!(report.members.len(), 5);
    }

    #[test]
    fn uniform_roster_has_no_categories() {
        let roster = vec![Worker::new("1", 90.0), Worker::new("2", 90.0)];
        let report = build(&roster);
        assert!(report.records.iter().all(|r| r.category.is_none()));
        assert_eq!(report.records[0].gap_vs_corporate_pct, Some(0.0));
        assert!(report.breakdown.iter().all(|s| s.count == 0));
    }

    #[test]
    fn corporate_members_carry_position() {
        let report = build(&scenario());
        let fair = report
            .members
            .iter()
            .find(|m| m.label == CategoryLabel::Fair)
            .unwrap();
        assert_eq!(
            fair.members,
            vec![MemberRef {
                id: "2".to_string(),
                position: Some("Analyst".to_string()),
            }]
        );
    }

    #[test]
    fn rebuild_is_identical() {
        let roster = scenario();
        let first = serde_json::to_string(&build(&roster)).unwrap();
        let second = serde_json::to_string(&build(&roster)).unwrap();
        assert_eq!(first, second);
    }
}
