//! Schedule (solution) model.
//!
//! A schedule is an ordered multiset of events (the genome) plus two
//! derived indices: events per team and events per resource, each kept
//! sorted by start time. Every mutator updates the flat list and both
//! indices together and drops the cached fitness.
//!
//! Only the flat event list and the fitness are serialized; the indices
//! are rebuilt when a schedule is deserialized.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Event, EventKind, Minutes, ResourceId, TeamId};

/// A complete (or partially built) tournament schedule.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "ScheduleRecord", into = "ScheduleRecord")]
pub struct Schedule {
    events: Vec<Event>,
    by_team: BTreeMap<TeamId, Vec<Event>>,
    by_resource: BTreeMap<ResourceId, Vec<Event>>,
    fitness: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct ScheduleRecord {
    events: Vec<Event>,
    fitness: Option<f64>,
}

impl From<ScheduleRecord> for Schedule {
    fn from(record: ScheduleRecord) -> Self {
        let mut schedule = Schedule::from_events(record.events);
        schedule.fitness = record.fitness;
        schedule
    }
}

impl From<Schedule> for ScheduleRecord {
    fn from(schedule: Schedule) -> Self {
        Self {
            events: schedule.events,
            fitness: schedule.fitness,
        }
    }
}

impl PartialEq for Schedule {
    fn eq(&self, other: &Self) -> bool {
        self.events == other.events && self.fitness == other.fitness
    }
}

impl Schedule {
    /// Creates an empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schedule from a genome, building both indices.
    pub fn from_events(events: impl IntoIterator<Item = Event>) -> Self {
        let mut schedule = Self::new();
        for event in events {
            schedule.push(event);
        }
        schedule
    }

    /// Appends an event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
        self.index_insert(event);
        self.fitness = None;
    }

    /// Replaces the event at `position`, returning the old one.
    ///
    /// # Panics
    /// If `position` is out of bounds.
    pub fn replace(&mut self, position: usize, event: Event) -> Event {
        let old = std::mem::replace(&mut self.events[position], event);
        self.index_remove(&old);
        self.index_insert(event);
        self.fitness = None;
        old
    }

    /// Exchanges the teams of the events at positions `i` and `j`.
    ///
    /// Each team takes over the other's time slot and resource. Positions
    /// in the genome do not move.
    ///
    /// # Panics
    /// If either position is out of bounds.
    pub fn swap_teams(&mut self, i: usize, j: usize) {
        if i == j || self.events[i].team_id == self.events[j].team_id {
            return;
        }
        let a = self.events[i];
        let b = self.events[j];
        self.replace(i, Event { team_id: b.team_id, ..a });
        self.replace(j, Event { team_id: a.team_id, ..b });
    }

    /// Removes every event.
    pub fn clear(&mut self) {
        self.events.clear();
        self.by_team.clear();
        self.by_resource.clear();
        self.fitness = None;
    }

    /// All events in genome order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Event at a genome position.
    pub fn get(&self, position: usize) -> Option<&Event> {
        self.events.get(position)
    }

    /// Events of a team, sorted by start time.
    pub fn events_for_team(&self, team_id: TeamId) -> &[Event] {
        self.by_team.get(&team_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Events on a resource, sorted by start time.
    pub fn events_for_resource(&self, resource: ResourceId) -> &[Event] {
        self.by_resource
            .get(&resource)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Teams that have at least one event, ascending.
    pub fn teams(&self) -> impl Iterator<Item = TeamId> + '_ {
        self.by_team.keys().copied()
    }

    /// Resources that have at least one event, ascending.
    pub fn resources(&self) -> impl Iterator<Item = ResourceId> + '_ {
        self.by_resource.keys().copied()
    }

    /// Per-team buckets (team, time-sorted events).
    pub fn team_buckets(&self) -> impl Iterator<Item = (TeamId, &[Event])> {
        self.by_team.iter().map(|(&t, v)| (t, v.as_slice()))
    }

    /// Per-resource buckets (resource, time-sorted events).
    pub fn resource_buckets(&self) -> impl Iterator<Item = (ResourceId, &[Event])> {
        self.by_resource.iter().map(|(&r, v)| (r, v.as_slice()))
    }

    /// Number of events of `kind` held by a team.
    pub fn count_for_team(&self, team_id: TeamId, kind: EventKind) -> usize {
        self.events_for_team(team_id)
            .iter()
            .filter(|e| e.kind == kind)
            .count()
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the schedule has no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Latest end time across all events (0 when empty).
    pub fn makespan(&self) -> Minutes {
        self.events.iter().map(Event::end).max().unwrap_or(0)
    }

    /// Cached fitness, `None` until evaluated after the last change.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    /// Stores a computed fitness.
    pub fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    /// Drops the cached fitness.
    pub fn invalidate_fitness(&mut self) {
        self.fitness = None;
    }

    /// Whether both indices hold exactly the events of the flat list.
    pub fn is_consistent(&self) -> bool {
        let team_total: usize = self.by_team.values().map(Vec::len).sum();
        let resource_total: usize = self.by_resource.values().map(Vec::len).sum();
        if team_total != self.events.len() || resource_total != self.events.len() {
            return false;
        }
        let sorted = |v: &Vec<Event>| v.windows(2).all(|w| w[0].start <= w[1].start);
        if !self.by_team.values().all(sorted) || !self.by_resource.values().all(sorted) {
            return false;
        }
        self.events.iter().all(|e| {
            let in_team = self.events_for_team(e.team_id).iter().filter(|x| *x == e).count();
            let in_resource = self
                .events_for_resource(e.resource)
                .iter()
                .filter(|x| *x == e)
                .count();
            let in_list = self.events.iter().filter(|x| *x == e).count();
            in_team == in_list && in_resource == in_list
        })
    }

    fn index_insert(&mut self, event: Event) {
        insert_sorted(self.by_team.entry(event.team_id).or_default(), event);
        insert_sorted(self.by_resource.entry(event.resource).or_default(), event);
    }

    fn index_remove(&mut self, event: &Event) {
        if let Some(bucket) = self.by_team.get_mut(&event.team_id) {
            remove_one(bucket, event);
            if bucket.is_empty() {
                self.by_team.remove(&event.team_id);
            }
        }
        if let Some(bucket) = self.by_resource.get_mut(&event.resource) {
            remove_one(bucket, event);
            if bucket.is_empty() {
                self.by_resource.remove(&event.resource);
            }
        }
    }
}

/// Inserts after every event with the same or an earlier start.
fn insert_sorted(bucket: &mut Vec<Event>, event: Event) {
    let pos = bucket.partition_point(|e| e.start <= event.start);
    bucket.insert(pos, event);
}

fn remove_one(bucket: &mut Vec<Event>, event: &Event) {
    if let Some(pos) = bucket.iter().position(|e| e == event) {
        bucket.remove(pos);
    }
}
