//! Greedy army composition under a point budget.
//!
//! Templates are ranked by attack per point, then health per point, then
//! cost (cheaper first). The composer buys as many of each template as the
//! budget and the per-type cap allow, walking down the ranking, then tops
//! up with the template that offers the most health per point. Finally the
//! units are placed into the deployment zone.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::army::Army;
use crate::board::{DeploymentZone, GridPos};
use crate::config::ComposerConfig;
use crate::math::{cmp_ratio, ratio, Fixed};
use crate::unit::{Unit, UnitTemplate};

/// Efficiency scores of one template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateScore<'a> {
    /// The scored template.
    pub template: &'a UnitTemplate,
    /// `base_attack / cost`, rounded. Reporting only.
    pub attack_score: Fixed,
    /// `health / cost`, rounded. Reporting only.
    pub health_score: Fixed,
}

impl<'a> TemplateScore<'a> {
    /// Score a template. Callers must ensure `cost > 0`.
    #[must_use]
    pub fn new(template: &'a UnitTemplate) -> Self {
        Self {
            template,
            attack_score: ratio(template.base_attack, template.cost),
            health_score: ratio(template.health, template.cost),
        }
    }

    /// Exact comparison of `health / cost`.
    fn cmp_health(&self, other: &Self) -> Ordering {
        let (a, b) = (self.template, other.template);
        cmp_ratio(a.health, a.cost, b.health, b.cost)
    }

    /// Ranking order: higher attack per point, higher health per point,
    /// lower cost. Ratios are compared exactly, never through the rounded
    /// scores.
    fn rank(&self, other: &Self) -> Ordering {
        let (a, b) = (self.template, other.template);
        cmp_ratio(b.base_attack, b.cost, a.base_attack, a.cost)
            .then_with(|| other.cmp_health(self))
            .then_with(|| a.cost.cmp(&b.cost))
    }
}

/// Rank the selectable templates of a catalog.
///
/// Templates with zero cost are dropped. The sort is stable, so templates
/// that tie on every key keep their catalog order.
#[must_use]
pub fn rank_templates(catalog: &[UnitTemplate]) -> Vec<TemplateScore<'_>> {
    let mut scored: Vec<_> = catalog
        .iter()
        .filter(|t| t.cost > 0)
        .map(TemplateScore::new)
        .collect();
    scored.sort_by(TemplateScore::rank);
    scored
}

/// Builds armies from a catalog.
#[derive(Debug, Clone, Default)]
pub struct ArmyComposer {
    config: ComposerConfig,
}

impl ArmyComposer {
    /// Create a composer with the given settings.
    #[must_use]
    pub const fn new(config: ComposerConfig) -> Self {
        Self { config }
    }

    /// Current settings.
    #[must_use]
    pub const fn config(&self) -> &ComposerConfig {
        &self.config
    }

    /// Compose an army whose total cost does not exceed `budget`.
    ///
    /// An empty catalog, a zero budget, or a catalog where nothing is
    /// affordable yields an empty army with zero points spent.
    #[must_use]
    pub fn compose(&self, catalog: &[UnitTemplate], budget: u32) -> Army {
        if catalog.is_empty() || budget == 0 {
            return Army::new();
        }

        let ranked = rank_templates(catalog);
        let cap = self.config.max_per_type;

        // First maximum in ranked order.
        let mut best_health: Option<&TemplateScore<'_>> = None;
        for score in &ranked {
            if best_health.map_or(true, |best| score.cmp_health(best) == Ordering::Greater) {
                best_health = Some(score);
            }
        }

        let mut units = Vec::new();
        let mut counts: HashMap<&str, u32> = HashMap::new();
        let mut remaining = budget;

        for score in &ranked {
            if remaining == 0 {
                break;
            }
            let template = score.template;
            let key = template.type_key();
            let already = counts.get(key).copied().unwrap_or(0);
            let can_take = cap.saturating_sub(already);
            if can_take == 0 {
                continue;
            }

            let take = can_take.min(remaining / template.cost);
            if take == 0 {
                continue;
            }
            for _ in 0..take {
                units.push(instantiate(template));
            }
            counts.insert(key, already + take);
            remaining -= take * template.cost;
            debug!(template = %template.name, take, remaining, "Picked template");
        }

        if let Some(best) = best_health {
            let template = best.template;
            let key = template.type_key();
            while remaining >= template.cost {
                let already = counts.get(key).copied().unwrap_or(0);
                if already >= cap {
                    break;
                }
                units.push(instantiate(template));
                counts.insert(key, already + 1);
                remaining -= template.cost;
                debug!(template = %template.name, remaining, "Topped up");
            }
        }

        place_in_zone(&mut units, self.config.zone, &[]);

        let spent = budget - remaining;
        debug!(budget, spent, units = units.len(), "Composed army");
        Army::with_points(units, spent)
    }
}

/// Compose with default settings: 11 per type, left deployment zone.
#[must_use]
pub fn compose_army(catalog: &[UnitTemplate], budget: u32) -> Army {
    ArmyComposer::default().compose(catalog, budget)
}

fn instantiate(template: &UnitTemplate) -> Unit {
    let mut unit = Unit::from_template(template);
    unit.unit_type = template.type_key().to_string();
    unit
}

/// Assign each unit the next free cell of `zone`, in column-major order.
///
/// Cells listed in `occupied` are skipped. Units left over once the zone is
/// full keep their current (unset) position. Returns how many units were
/// placed.
pub fn place_in_zone(units: &mut [Unit], zone: DeploymentZone, occupied: &[GridPos]) -> usize {
    let mut taken = vec![false; zone.capacity()];
    let height = zone.height.max(0) as usize;
    for pos in occupied {
        if zone.contains(*pos) {
            taken[(pos.x - zone.x_min) as usize * height + pos.y as usize] = true;
        }
    }

    let mut free = zone
        .cells()
        .zip(taken)
        .filter(|(_, is_taken)| !is_taken)
        .map(|(pos, _)| pos);

    let total = units.len();
    let mut placed = 0;
    for unit in units.iter_mut() {
        let Some(pos) = free.next() else {
            warn!(
                unplaced = total - placed,
                "Deployment zone full, leaving units unplaced"
            );
            break;
        };
        unit.position = Some(pos);
        placed += 1;
    }
    placed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MAX_PER_TYPE;

    fn template(name: &str, unit_type: &str, health: u32, attack: u32, cost: u32) -> UnitTemplate {
        UnitTemplate::new(name, unit_type, health, attack, cost)
    }

    fn total_cost(army: &Army) -> u32 {
        army.units().iter().map(|u| u.cost).sum()
    }

    #[test]
    fn test_zero_budget_or_empty_catalog() {
        let catalog = vec![template("Swordsman", "Infantry", 100, 20, 10)];

        let army = compose_army(&catalog, 0);
        assert!(army.is_empty());
        assert_eq!(army.points(), 0);

        let army = compose_army(&[], 100);
        assert!(army.is_empty());
        assert_eq!(army.points(), 0);
    }

    #[test]
    fn test_nothing_affordable() {
        let catalog = vec![
            template("Knight", "Cavalry", 150, 30, 40),
            template("Catapult", "Siege", 80, 60, 55),
        ];
        let army = compose_army(&catalog, 39);
        assert!(army.is_empty());
        assert_eq!(army.points(), 0);
    }

    #[test]
    fn test_zero_cost_templates_ignored() {
        let catalog = vec![
            template("Peasant", "Militia", 10, 50, 0),
            template("Swordsman", "Infantry", 100, 20, 10),
        ];
        let army = compose_army(&catalog, 30);
        assert_eq!(army.len(), 3);
        assert!(army.units().iter().all(|u| u.name == "Swordsman"));
    }

    #[test]
    fn test_single_template_count() {
        let catalog = vec![template("Swordsman", "Infantry", 100, 20, 7)];

        for budget in [1, 6, 7, 20, 76, 77, 78, 500] {
            let army = compose_army(&catalog, budget);
            let expected = (budget / 7).min(MAX_PER_TYPE) as usize;
            assert_eq!(army.len(), expected, "budget {budget}");
            assert_eq!(army.points(), expected as u32 * 7);
        }
    }

    #[test]
    fn test_ranking_prefers_attack_per_point() {
        let catalog = vec![
            template("Swordsman", "Infantry", 100, 20, 10), // 2.0 atk/pt
            template("Archer", "Archer", 40, 30, 10),       // 3.0 atk/pt
        ];
        let ranked = rank_templates(&catalog);
        assert_eq!(ranked[0].template.name, "Archer");
        assert_eq!(ranked[1].template.name, "Swordsman");

        let army = compose_army(&catalog, 50);
        assert_eq!(army.len(), 5);
        assert!(army.units().iter().all(|u| u.name == "Archer"));
    }

    #[test]
    fn test_ranking_ties_broken_by_health_then_cost() {
        let catalog = vec![
            template("Heavy", "A", 40, 20, 20), // atk 1.0, hp 2.0
            template("Light", "B", 10, 10, 10), // atk 1.0, hp 1.0
            template("Cheap", "C", 20, 10, 10), // atk 1.0, hp 2.0, cheaper than Heavy
        ];
        let names: Vec<_> = rank_templates(&catalog)
            .iter()
            .map(|s| s.template.name.as_str())
            .collect();
        assert_eq!(names, ["Cheap", "Heavy", "Light"]);
    }

    #[test]
    fn test_ranking_separates_close_ratios() {
        // 999_999/1_000_000 and 1_000_000/1_000_001 round to the same
        // fixed-point score; the second is strictly larger.
        let catalog = vec![
            template("Steady", "A", 1_000_000, 999_999, 1_000_000),
            template("Sharp", "B", 1, 1_000_000, 1_000_001),
        ];
        let names: Vec<_> = rank_templates(&catalog)
            .iter()
            .map(|s| s.template.name.as_str())
            .collect();
        assert_eq!(names, ["Sharp", "Steady"]);
    }

    #[test]
    fn test_ranking_beyond_fixed_range() {
        let catalog = vec![
            template("Weak", "A", 10, 3_000_000_000, 1),
            template("Strong", "B", 10, 4_000_000_000, 1),
        ];
        let names: Vec<_> = rank_templates(&catalog)
            .iter()
            .map(|s| s.template.name.as_str())
            .collect();
        assert_eq!(names, ["Strong", "Weak"]);
    }

    #[test]
    fn test_health_tie_break_is_exact() {
        // Equal attack per point; health ratios differ below fixed-point
        // precision.
        let catalog = vec![
            template("Steady", "A", 999_999, 0, 1_000_000),
            template("Sturdy", "B", 1_000_000, 0, 1_000_001),
        ];
        let ranked = rank_templates(&catalog);
        assert_eq!(ranked[0].template.name, "Sturdy");
    }

    #[test]
    fn test_full_ties_keep_catalog_order() {
        let catalog = vec![
            template("First", "A", 10, 10, 10),
            template("Second", "B", 10, 10, 10),
            template("Third", "C", 10, 10, 10),
        ];
        let names: Vec<_> = rank_templates(&catalog)
            .iter()
            .map(|s| s.template.name.as_str())
            .collect();
        assert_eq!(names, ["First", "Second", "Third"]);
    }

    #[test]
    fn test_cap_spills_to_next_template() {
        let catalog = vec![
            template("Archer", "Archer", 40, 30, 10),
            template("Swordsman", "Infantry", 100, 20, 10),
        ];
        let army = compose_army(&catalog, 200);

        let archers = army.units().iter().filter(|u| u.name == "Archer").count();
        let swords = army.units().iter().filter(|u| u.name == "Swordsman").count();
        assert_eq!(archers, 11);
        assert_eq!(swords, 9);
        assert_eq!(army.points(), 200);
    }

    #[test]
    fn test_shared_type_label_shares_cap() {
        let catalog = vec![
            template("Longbow", "Archer", 40, 30, 10),
            template("Crossbow", "Archer", 40, 28, 10),
            template("Swordsman", "Infantry", 100, 20, 10),
        ];
        let army = compose_army(&catalog, 1000);

        let archers = army.units().iter().filter(|u| u.unit_type == "Archer").count();
        assert_eq!(archers, 11);
        assert!(army.units().iter().all(|u| u.name != "Crossbow"));
    }

    #[test]
    fn test_budget_never_exceeded() {
        let catalog = vec![
            template("Archer", "Archer", 40, 30, 13),
            template("Swordsman", "Infantry", 100, 20, 9),
            template("Knight", "Cavalry", 150, 35, 21),
        ];
        for budget in [5, 9, 22, 47, 100, 333, 1000] {
            let army = compose_army(&catalog, budget);
            assert!(total_cost(&army) <= budget);
            assert_eq!(army.points(), total_cost(&army));
        }
    }

    #[test]
    fn test_instances_get_resolved_type_label() {
        let catalog = vec![template("Militia", "  ", 30, 5, 5)];
        let army = compose_army(&catalog, 10);
        assert!(army.units().iter().all(|u| u.unit_type == "Militia"));
        // The catalog itself is untouched.
        assert_eq!(catalog[0].unit_type, "  ");
    }

    #[test]
    fn test_placement_is_column_major_in_left_zone() {
        let catalog = vec![
            template("Archer", "Archer", 40, 30, 1),
            template("Swordsman", "Infantry", 100, 20, 1),
            template("Knight", "Cavalry", 150, 25, 1),
        ];
        let army = compose_army(&catalog, 1000);
        assert_eq!(army.len(), 33);

        let positions: Vec<_> = army.units().iter().map(|u| u.position.unwrap()).collect();
        assert_eq!(positions[0], GridPos::new(0, 0));
        assert_eq!(positions[20], GridPos::new(0, 20));
        assert_eq!(positions[21], GridPos::new(1, 0));
        assert_eq!(positions[32], GridPos::new(1, 11));

        let mut unique = positions.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), positions.len());
    }

    #[test]
    fn test_zone_overflow_leaves_units_unplaced() {
        let composer = ArmyComposer::new(ComposerConfig {
            max_per_type: 11,
            zone: DeploymentZone {
                x_min: 0,
                x_max: 0,
                height: 4,
            },
        });
        let catalog = vec![template("Swordsman", "Infantry", 100, 20, 1)];
        let army = composer.compose(&catalog, 6);

        assert_eq!(army.len(), 6);
        assert_eq!(army.units().iter().filter(|u| u.position.is_some()).count(), 4);
        assert!(army.units()[4].position.is_none());
        assert!(army.units()[5].position.is_none());
    }

    #[test]
    fn test_place_in_zone_skips_occupied() {
        let template = template("Swordsman", "Infantry", 100, 20, 1);
        let mut units: Vec<_> = (0..3).map(|_| Unit::from_template(&template)).collect();
        let occupied = [GridPos::new(0, 0), GridPos::new(0, 2), GridPos::new(9, 9)];

        let placed = place_in_zone(&mut units, DeploymentZone::LEFT, &occupied);
        assert_eq!(placed, 3);
        assert_eq!(units[0].position, Some(GridPos::new(0, 1)));
        assert_eq!(units[1].position, Some(GridPos::new(0, 3)));
        assert_eq!(units[2].position, Some(GridPos::new(0, 4)));
    }

    #[test]
    fn test_custom_cap() {
        let composer = ArmyComposer::new(ComposerConfig {
            max_per_type: 2,
            ..ComposerConfig::default()
        });
        let catalog = vec![
            template("Archer", "Archer", 40, 30, 5),
            template("Swordsman", "Infantry", 100, 20, 5),
        ];
        let army = composer.compose(&catalog, 100);
        assert_eq!(army.len(), 4);
        assert_eq!(army.points(), 20);
    }
}
