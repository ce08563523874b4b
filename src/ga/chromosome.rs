//! Event-list genome operators.
//!
//! # Encoding
//!
//! The genome is the schedule's flat event list in insertion order. Each
//! event is a gene identified by `(team, kind, occurrence)`, where
//! occurrence is the event's rank among the same team's same-kind events
//! in genome order. A valid genome holds every gene exactly once, which is
//! equivalent to every team holding its required number of each kind.
//!
//! # Reference
//! - Goldberg & Lingle (1985), "Alleles, Loci, and the Traveling Salesman
//!   Problem" (partially mapped crossover and its repair step)
//! - Syswerda (1991), "Schedule Optimization Using Genetic Algorithms"

use std::collections::{HashMap, HashSet};

use rand::Rng;

use crate::error::ScheduleError;
use crate::models::{Event, EventKind, Schedule, TeamId};

/// Identity of one gene in a genome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneKey {
    /// Owning team.
    pub team_id: TeamId,
    /// Event kind.
    pub kind: EventKind,
    /// Rank among the team's events of this kind (0-based).
    pub occurrence: usize,
}

/// Gene key of every event, in genome order.
pub fn gene_keys(events: &[Event]) -> Vec<GeneKey> {
    let mut counters: HashMap<(TeamId, EventKind), usize> = HashMap::new();
    events
        .iter()
        .map(|e| {
            let n = counters.entry((e.team_id, e.kind)).or_insert(0);
            let key = GeneKey {
                team_id: e.team_id,
                kind: e.kind,
                occurrence: *n,
            };
            *n += 1;
            key
        })
        .collect()
}

// ======================== Crossover ========================

/// Two-point crossover with deterministic repair.
///
/// The child takes `a[..x1]`, `b[x1..x2]` and `a[x2..]`. Outer genes that
/// reappear in the middle segment are then replaced, in order, by the genes
/// of `a`'s middle segment that `b`'s middle segment lacks. Both parents
/// must carry the same gene multiset; the child then does too.
///
/// # Errors
/// - [`ScheduleError::InvalidCut`] unless `x1 < x2 <= len`
/// - [`ScheduleError::GenomeMismatch`] if the parents differ in length or genes
/// - [`ScheduleError::RepairMismatch`] if duplicates and missing genes do not pair up
pub fn two_point_crossover(
    a: &Schedule,
    b: &Schedule,
    x1: usize,
    x2: usize,
) -> Result<Schedule, ScheduleError> {
    let (ea, eb) = (a.events(), b.events());
    if ea.len() != eb.len() {
        return Err(ScheduleError::GenomeMismatch {
            reason: format!("genome lengths differ ({} vs {})", ea.len(), eb.len()),
        });
    }
    let len = ea.len();
    if x1 >= x2 || x2 > len {
        return Err(ScheduleError::InvalidCut { x1, x2, len });
    }

    let keys_a = gene_keys(ea);
    let keys_b = gene_keys(eb);
    check_same_genes(&keys_a, &keys_b)?;

    let middle: HashSet<GeneKey> = keys_b[x1..x2].iter().copied().collect();
    let mut missing = ea[x1..x2]
        .iter()
        .zip(&keys_a[x1..x2])
        .filter(|(_, key)| !middle.contains(key))
        .map(|(event, _)| *event);
    let missing_count = keys_a[x1..x2]
        .iter()
        .filter(|key| !middle.contains(key))
        .count();

    let mut duplicates = 0;
    let mut genome = Vec::with_capacity(len);
    for position in 0..len {
        if (x1..x2).contains(&position) {
            genome.push(eb[position]);
            continue;
        }
        if !middle.contains(&keys_a[position]) {
            genome.push(ea[position]);
            continue;
        }
        duplicates += 1;
        match missing.next() {
            Some(event) => genome.push(event),
            None => break,
        }
    }

    if duplicates != missing_count || genome.len() != len {
        return Err(ScheduleError::RepairMismatch {
            duplicates,
            missing: missing_count,
        });
    }

    Ok(Schedule::from_events(genome))
}

fn check_same_genes(keys_a: &[GeneKey], keys_b: &[GeneKey]) -> Result<(), ScheduleError> {
    let mut sorted_a = keys_a.to_vec();
    let mut sorted_b = keys_b.to_vec();
    sorted_a.sort_unstable();
    sorted_b.sort_unstable();

    match sorted_a.iter().zip(&sorted_b).find(|(ka, kb)| ka != kb) {
        None => Ok(()),
        Some((ka, kb)) => Err(ScheduleError::GenomeMismatch {
            reason: format!(
                "gene sets differ: team {} {:?} #{} vs team {} {:?} #{}",
                ka.team_id, ka.kind, ka.occurrence, kb.team_id, kb.kind, kb.occurrence
            ),
        }),
    }
}

// ======================== Mutation ========================

/// Team-swap mutation.
///
/// Runs `trials` independent trials. Each fires with `probability`, picks a
/// random event and a random event of the same kind, and lets their teams
/// trade slots. Every team keeps its kind counts. Returns the number of
/// swaps that changed the schedule.
///
/// This is not a swap of two genome positions: events carry their own
/// times, so reordering the list alone would leave the timetable as it
/// was. Swapping teams between slots moves teams in time instead.
///
/// `probability` is clamped to `[0, 1]`; NaN counts as 0.
pub fn swap_mutation<R: Rng>(
    schedule: &mut Schedule,
    probability: f64,
    trials: usize,
    rng: &mut R,
) -> usize {
    let len = schedule.len();
    if len < 2 {
        return 0;
    }
    let probability = if probability.is_nan() {
        0.0
    } else {
        probability.clamp(0.0, 1.0)
    };

    let mut changed = 0;
    for _ in 0..trials {
        if !rng.random_bool(probability) {
            continue;
        }
        let i = rng.random_range(0..len);
        let kind = schedule.events()[i].kind;
        let same_kind: Vec<usize> = schedule
            .events()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.kind == kind)
            .map(|(pos, _)| pos)
            .collect();
        let j = same_kind[rng.random_range(0..same_kind.len())];
        if schedule.events()[i].team_id != schedule.events()[j].team_id {
            schedule.swap_teams(i, j);
            changed += 1;
        }
    }
    changed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TournamentConfig;
    use crate::generator::ScheduleGenerator;
    use crate::models::ResourceId;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn ev(team: TeamId, kind: EventKind, start: i64) -> Event {
        Event::new(team, kind, start, 10, ResourceId::table(0))
    }

    fn kind_counts(schedule: &Schedule) -> Vec<(TeamId, EventKind, usize)> {
        let mut counts: Vec<_> = schedule
            .teams()
            .flat_map(|t| EventKind::ALL.map(|k| (t, k, schedule.count_for_team(t, k))))
            .collect();
        counts.sort();
        counts
    }

    /// Two small parents: same genes, different order.
    fn parents() -> (Schedule, Schedule) {
        let a = Schedule::from_events([
            ev(1, EventKind::TableRun, 0),
            ev(2, EventKind::TableRun, 20),
            ev(1, EventKind::TableRun, 40),
            ev(3, EventKind::ProjectJudging, 60),
            ev(2, EventKind::Lunch, 80),
            ev(3, EventKind::TableRun, 100),
        ]);
        let b = Schedule::from_events([
            ev(3, EventKind::TableRun, 5),
            ev(2, EventKind::Lunch, 25),
            ev(1, EventKind::TableRun, 45),
            ev(2, EventKind::TableRun, 65),
            ev(3, EventKind::ProjectJudging, 85),
            ev(1, EventKind::TableRun, 105),
        ]);
        (a, b)
    }

    fn same_genes(x: &Schedule, y: &Schedule) -> bool {
        let mut kx = gene_keys(x.events());
        let mut ky = gene_keys(y.events());
        kx.sort();
        ky.sort();
        kx == ky
    }

    #[test]
    fn test_gene_keys_count_occurrences() {
        let (a, _) = parents();
        let keys = gene_keys(a.events());
        assert_eq!(keys[0].occurrence, 0);
        assert_eq!(keys[2].occurrence, 1); // team 1's second table run
        assert_eq!(keys[1].occurrence, 0);
        assert_eq!(keys[5].occurrence, 0);
    }

    #[test]
    fn test_crossover_closure_all_cuts() {
        let (a, b) = parents();
        let len = a.len();
        for x1 in 0..len {
            for x2 in x1 + 1..=len {
                let child = two_point_crossover(&a, &b, x1, x2).unwrap();
                assert_eq!(child.len(), len);
                assert!(same_genes(&child, &a), "cut ({x1}, {x2})");
                assert_eq!(kind_counts(&child), kind_counts(&a));
                assert!(child.fitness().is_none());

                let reverse = two_point_crossover(&b, &a, x1, x2).unwrap();
                assert!(same_genes(&reverse, &a), "reverse cut ({x1}, {x2})");
            }
        }
    }

    #[test]
    fn test_crossover_takes_middle_from_b() {
        let (a, b) = parents();
        let child = two_point_crossover(&a, &b, 2, 4).unwrap();
        assert_eq!(child.events()[2], b.events()[2]);
        assert_eq!(child.events()[3], b.events()[3]);
    }

    #[test]
    fn test_crossover_full_range_copies_b() {
        let (a, b) = parents();
        let child = two_point_crossover(&a, &b, 0, a.len()).unwrap();
        assert_eq!(child.events(), b.events());
    }

    #[test]
    fn test_crossover_on_generated_schedules() {
        let config = TournamentConfig::default();
        let generator = ScheduleGenerator::new(&config);
        let a = generator.build(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let b = generator.build(&[8, 7, 6, 5, 4, 3, 2, 1]);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..200 {
            let x1 = rng.random_range(0..a.len());
            let x2 = rng.random_range(x1 + 1..=a.len());
            let child = two_point_crossover(&a, &b, x1, x2).unwrap();
            assert!(same_genes(&child, &a));
            assert!(child.is_consistent());
        }
    }

    #[test]
    fn test_invalid_cut() {
        let (a, b) = parents();
        assert!(matches!(
            two_point_crossover(&a, &b, 3, 3),
            Err(ScheduleError::InvalidCut { x1: 3, x2: 3, len: 6 })
        ));
        assert!(matches!(
            two_point_crossover(&a, &b, 0, 7),
            Err(ScheduleError::InvalidCut { .. })
        ));
    }

    #[test]
    fn test_mismatched_parents() {
        let (a, _) = parents();
        let shorter = Schedule::from_events(a.events()[..5].iter().copied());
        assert!(matches!(
            two_point_crossover(&a, &shorter, 0, 2),
            Err(ScheduleError::GenomeMismatch { .. })
        ));

        let mut other = a.clone();
        other.replace(4, ev(1, EventKind::Lunch, 80));
        assert!(matches!(
            two_point_crossover(&a, &other, 0, 2),
            Err(ScheduleError::GenomeMismatch { .. })
        ));
    }

    #[test]
    fn test_swap_mutation_preserves_counts() {
        let config = TournamentConfig::default();
        let generator = ScheduleGenerator::new(&config);
        let mut schedule = generator.build(&[1, 2, 3, 4, 5, 6, 7, 8]);
        let before = kind_counts(&schedule);
        let original = schedule.clone();
        let mut rng = SmallRng::seed_from_u64(42);

        let changed = swap_mutation(&mut schedule, 1.0, 50, &mut rng);
        assert!(changed > 0);
        assert_eq!(kind_counts(&schedule), before);
        assert!(same_genes(&schedule, &original));
        assert!(schedule.is_consistent());
        assert!(schedule.fitness().is_none());

        // Slots stay put; only team labels move.
        for (x, y) in schedule.events().iter().zip(original.events()) {
            assert_eq!((x.kind, x.start, x.resource), (y.kind, y.start, y.resource));
        }
    }

    #[test]
    fn test_swap_mutation_zero_probability() {
        let (mut a, _) = parents();
        let original = a.clone();
        let mut rng = SmallRng::seed_from_u64(42);
        assert_eq!(swap_mutation(&mut a, 0.0, 100, &mut rng), 0);
        assert_eq!(a.events(), original.events());
    }

    #[test]
    fn test_swap_mutation_clamps_probability() {
        let config = TournamentConfig::default();
        let generator = ScheduleGenerator::new(&config);
        let schedule = generator.build(&[1, 2, 3, 4, 5, 6, 7, 8]);

        for p in [-0.5, f64::NAN] {
            let mut s = schedule.clone();
            let mut rng = SmallRng::seed_from_u64(42);
            assert_eq!(swap_mutation(&mut s, p, 20, &mut rng), 0);
            assert_eq!(s.events(), schedule.events());
        }

        let mut over = schedule.clone();
        let mut certain = schedule.clone();
        let mut rng = SmallRng::seed_from_u64(42);
        let changed_over = swap_mutation(&mut over, 1.5, 20, &mut rng);
        let mut rng = SmallRng::seed_from_u64(42);
        let changed_certain = swap_mutation(&mut certain, 1.0, 20, &mut rng);
        assert_eq!(changed_over, changed_certain);
        assert_eq!(over.events(), certain.events());
    }
}
