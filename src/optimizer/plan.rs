// src/optimizer/plan.rs — Building and applying a reordering plan

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, VecDeque};

use super::types::{NavItem, OptimizedItem};

/// Group the catalog by category (first-appearance order), sort selected
/// categories by descending score with unscored entries last, and keep
/// non-selected categories in their original relative order.
pub fn build_plan(
    catalog: &[NavItem],
    scores: &HashMap<String, f64>,
    selected: &BTreeSet<String>,
) -> Vec<OptimizedItem> {
    let mut groups: Vec<Vec<usize>> = Vec::new();
    let mut group_of: HashMap<&str, usize> = HashMap::new();

    for (index, item) in catalog.iter().enumerate() {
        let slot = *group_of.entry(item.category.as_str()).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(index);
    }

    let score_of = |index: usize| scores.get(&catalog[index].path).copied();

    for group in &mut groups {
        let Some(&first) = group.first() else {
            continue;
        };
        if !selected.contains(&catalog[first].category) {
            continue;
        }
        // Stable: equal scores and unscored entries keep catalog order
        group.sort_by(|&a, &b| match (score_of(a), score_of(b)) {
            (Some(x), Some(y)) => y.total_cmp(&x),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
    }

    groups
        .into_iter()
        .flatten()
        .enumerate()
        .map(|(optimized_index, original_index)| OptimizedItem {
            destination: catalog[original_index].path.clone(),
            original_index,
            optimized_index,
            score: score_of(original_index),
        })
        .collect()
}

/// Reorder `catalog` by the plan. Every catalog entry appears exactly once:
/// plan entries for unknown destinations are skipped, and catalog entries the
/// plan does not mention are appended in their original order.
pub fn apply_plan(catalog: &[NavItem], items: &[OptimizedItem]) -> Vec<NavItem> {
    let mut slots: HashMap<&str, VecDeque<usize>> = HashMap::new();
    for (index, item) in catalog.iter().enumerate() {
        slots.entry(item.path.as_str()).or_default().push_back(index);
    }

    let mut ordered: Vec<&OptimizedItem> = items.iter().collect();
    ordered.sort_by_key(|item| item.optimized_index);

    let mut used = vec![false; catalog.len()];
    let mut output = Vec::with_capacity(catalog.len());

    for item in ordered {
        let next = slots
            .get_mut(item.destination.as_str())
            .and_then(VecDeque::pop_front);
        if let Some(index) = next {
            used[index] = true;
            output.push(catalog[index].clone());
        }
    }

    output.extend(
        catalog
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(item, _)| item.clone()),
    );
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<NavItem> {
        vec![
            NavItem::new("/dashboard", "Dashboard", "home"),
            NavItem::new("/reports", "Reports", "operations"),
            NavItem::new("/orders", "Orders", "operations"),
            NavItem::new("/settings", "Settings", "admin"),
            NavItem::new("/inventory", "Inventory", "operations"),
            NavItem::new("/users", "Users", "admin"),
        ]
    }

    fn paths(items: &[NavItem]) -> Vec<&str> {
        items.iter().map(|i| i.path.as_str()).collect()
    }

    fn selected(categories: &[&str]) -> BTreeSet<String> {
        categories.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_selected_category_sorted_by_score() {
        let scores = HashMap::from([
            ("/orders".to_string(), 40.0),
            ("/inventory".to_string(), 25.0),
            ("/users".to_string(), 90.0),
        ]);
        let catalog = catalog();
        let plan = build_plan(&catalog, &scores, &selected(&["operations"]));
        let output = apply_plan(&catalog, &plan);

        // Groups in first-appearance order; admin not selected so /settings stays before /users
        assert_eq!(
            paths(&output),
            vec!["/dashboard", "/orders", "/inventory", "/reports", "/settings", "/users"]
        );
        assert_eq!(plan[1].destination, "/orders");
        assert_eq!(plan[1].original_index, 2);
        assert_eq!(plan[1].optimized_index, 1);
        assert_eq!(plan[1].score, Some(40.0));
        assert_eq!(plan[3].score, None);
    }

    #[test]
    fn test_unscored_keep_original_order() {
        let scores = HashMap::from([("/inventory".to_string(), 10.0)]);
        let catalog = catalog();
        let plan = build_plan(&catalog, &scores, &selected(&["operations"]));
        let output = apply_plan(&catalog, &plan);
        assert_eq!(
            paths(&output[1..4]),
            vec!["/inventory", "/reports", "/orders"]
        );
    }

    #[test]
    fn test_apply_appends_missing_entries() {
        let catalog = catalog();
        let plan = vec![OptimizedItem {
            destination: "/orders".into(),
            original_index: 2,
            optimized_index: 0,
            score: Some(10.0),
        }];
        let output = apply_plan(&catalog, &plan);
        assert_eq!(
            paths(&output),
            vec!["/orders", "/dashboard", "/reports", "/settings", "/inventory", "/users"]
        );
    }

    #[test]
    fn test_apply_skips_unknown_and_duplicate_plan_entries() {
        let catalog = catalog();
        let plan = vec![
            OptimizedItem {
                destination: "/gone".into(),
                original_index: 0,
                optimized_index: 0,
                score: None,
            },
            OptimizedItem {
                destination: "/users".into(),
                original_index: 5,
                optimized_index: 1,
                score: None,
            },
            OptimizedItem {
                destination: "/users".into(),
                original_index: 5,
                optimized_index: 2,
                score: None,
            },
        ];
        let output = apply_plan(&catalog, &plan);
        assert_eq!(output.len(), catalog.len());
        assert_eq!(output[0].path, "/users");
    }

    #[test]
    fn test_duplicate_catalog_paths_preserved() {
        let catalog = vec![
            NavItem::new("/a", "A", "ops"),
            NavItem::new("/b", "B", "ops"),
            NavItem::new("/a", "A again", "ops"),
        ];
        let scores = HashMap::from([("/a".to_string(), 5.0)]);
        let plan = build_plan(&catalog, &scores, &selected(&["ops"]));
        let output = apply_plan(&catalog, &plan);
        let labels: Vec<_> = output.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["A", "A again", "B"]);
    }

    #[test]
    fn test_empty_catalog() {
        let plan = build_plan(&[], &HashMap::new(), &selected(&["ops"]));
        assert!(plan.is_empty());
        assert!(apply_plan(&[], &plan).is_empty());
    }
}
