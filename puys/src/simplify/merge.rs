//! Fusion des courbes ouvertes dont les extrémités se touchent
//!
//! File de travail explicite: un tas-min de paires candidates, ordonné par
//! écart puis par identifiant, jusqu'au point fixe. Seules des courbes de
//! même altitude sont fusionnées.

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

use geo::Coord;

use crate::types::{coords_equal, distance, Polyline};

/// Extrémités mises bout à bout (`a` toujours d'identifiant inférieur)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Pairing {
    /// fin de `a` -> début de `b`
    EndStart,
    /// fin de `a` -> fin de `b`
    EndEnd,
    /// début de `a` -> fin de `b`
    StartEnd,
    /// début de `a` -> début de `b`
    StartStart,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    gap: f64,
    a: usize,
    b: usize,
    pairing: Pairing,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        self.gap
            .total_cmp(&other.gap)
            .then(self.a.cmp(&other.a))
            .then(self.b.cmp(&other.b))
            .then(self.pairing.cmp(&other.pairing))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Résultat de la passe de fusion
#[derive(Debug)]
pub struct MergeOutcome {
    /// Courbes restantes: non fusionnées dans l'ordre d'entrée, puis
    /// fusionnées dans l'ordre de création
    pub polylines: Vec<Polyline>,

    /// Nombre de fusions effectuées
    pub merges: usize,
}

/// Meilleur appariement entre deux courbes, s'il est sous le seuil
///
/// À écart égal, l'ordre de déclaration de [`Pairing`] départage.
pub fn best_pairing(a: &Polyline, b: &Polyline, merge_distance: f64) -> Option<(f64, Pairing)> {
    let options = [
        (distance(a.last(), b.first()), Pairing::EndStart),
        (distance(a.last(), b.last()), Pairing::EndEnd),
        (distance(a.first(), b.last()), Pairing::StartEnd),
        (distance(a.first(), b.first()), Pairing::StartStart),
    ];

    options
        .into_iter()
        .filter(|(gap, _)| *gap <= merge_distance)
        .min_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)))
}

/// Concatène deux courbes selon l'appariement choisi
///
/// Un point de jonction confondu n'est pas dupliqué.
pub fn concatenate(a: &Polyline, b: &Polyline, pairing: Pairing) -> Polyline {
    let forward = |p: &Polyline| p.line.0.clone();
    let backward = |p: &Polyline| p.line.0.iter().rev().copied().collect::<Vec<Coord>>();

    let (head, tail) = match pairing {
        Pairing::EndStart => (forward(a), forward(b)),
        Pairing::EndEnd => (forward(a), backward(b)),
        Pairing::StartEnd => (forward(b), forward(a)),
        Pairing::StartStart => (backward(b), forward(a)),
    };

    let mut coords = head;
    let skip = match (coords.last(), tail.first()) {
        (Some(&joint), Some(&next)) if coords_equal(joint, next) => 1,
        _ => 0,
    };
    coords.extend(tail.into_iter().skip(skip));

    Polyline::new(a.elevation, coords)
}

/// Fusionne les courbes ouvertes jusqu'au point fixe
pub fn merge_open(open: Vec<Polyline>, merge_distance: f64) -> MergeOutcome {
    let mut slots: Vec<Option<Polyline>> = open.into_iter().map(Some).collect();
    let mut heap: BinaryHeap<Reverse<Candidate>> = BinaryHeap::new();

    // Identifiants vivants par altitude (ordre croissant)
    let mut by_elevation: BTreeMap<i32, Vec<usize>> = BTreeMap::new();
    for (id, slot) in slots.iter().enumerate() {
        if let Some(polyline) = slot {
            by_elevation.entry(polyline.elevation).or_default().push(id);
        }
    }

    for ids in by_elevation.values() {
        for (i, &a) in ids.iter().enumerate() {
            for &b in &ids[i + 1..] {
                push_candidate(&mut heap, &slots, a, b, merge_distance);
            }
        }
    }

    let mut merges = 0;
    while let Some(Reverse(candidate)) = heap.pop() {
        if slots[candidate.a].is_none() || slots[candidate.b].is_none() {
            continue;
        }
        let (Some(a), Some(b)) = (slots[candidate.a].take(), slots[candidate.b].take()) else {
            continue;
        };

        let merged = concatenate(&a, &b, candidate.pairing);
        let elevation = merged.elevation;
        let merged_closed = merged.is_closed();
        let merged_id = slots.len();
        slots.push(Some(merged));
        merges += 1;

        let ids = by_elevation.entry(elevation).or_default();
        ids.retain(|&id| id != candidate.a && id != candidate.b);

        // Une courbe refermée par la fusion ne participe plus
        if !merged_closed {
            for &other in ids.iter() {
                push_candidate(&mut heap, &slots, other, merged_id, merge_distance);
            }
            ids.push(merged_id);
        }
    }

    MergeOutcome {
        polylines: slots.into_iter().flatten().collect(),
        merges,
    }
}

fn push_candidate(
    heap: &mut BinaryHeap<Reverse<Candidate>>,
    slots: &[Option<Polyline>],
    a: usize,
    b: usize,
    merge_distance: f64,
) {
    let (Some(pa), Some(pb)) = (&slots[a], &slots[b]) else {
        return;
    };
    if let Some((gap, pairing)) = best_pairing(pa, pb, merge_distance) {
        heap.push(Reverse(Candidate { gap, a, b, pairing }));
    }
}
