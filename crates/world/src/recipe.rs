//! Smithing recipes with JSON-based loading.
//!
//! A smithing recipe turns an ordered (template, base, addition) triple into a
//! single result item. Matching is exact item-kind equality per role.

use crate::slots::{SlotRole, SlotStore};
use anyhow::{Context, Result};
use autosmith_core::{ItemKey, ItemStack};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// The ordered triple offered to a recipe source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmithingInput {
    /// Item in the template slot.
    pub template: ItemKey,
    /// Item in the base slot.
    pub base: ItemKey,
    /// Item in the addition slot.
    pub addition: ItemKey,
}

impl SmithingInput {
    /// Build the triple from a station's slots. `None` unless all three are filled.
    pub fn from_slots(slots: &SlotStore) -> Option<Self> {
        Some(Self {
            template: slots.by_role(SlotRole::Template)?.clone(),
            base: slots.by_role(SlotRole::Base)?.clone(),
            addition: slots.by_role(SlotRole::Addition)?.clone(),
        })
    }
}

/// Anything that can answer "what does this triple smith into?".
pub trait RecipeSource {
    /// Result of smithing `input`, or `None` when no recipe applies.
    fn match_smithing(&self, input: &SmithingInput) -> Option<ItemStack>;
}

/// Smithing recipe definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmithingRecipe {
    /// Unique recipe identifier (e.g., "netherite_sword").
    pub id: String,
    /// Required template item.
    pub template: ItemKey,
    /// Required base item.
    pub base: ItemKey,
    /// Required addition item.
    pub addition: ItemKey,
    /// Item produced by this recipe.
    pub result: ItemKey,
}

impl SmithingRecipe {
    /// Exact kind equality on all three roles.
    pub fn matches(&self, input: &SmithingInput) -> bool {
        self.template == input.template && self.base == input.base && self.addition == input.addition
    }
}

/// Recipe registry keyed by id. Iteration order is by id, so the first match
/// for an ambiguous triple is stable.
#[derive(Debug, Clone, Default)]
pub struct SmithingRecipeBook {
    recipes: BTreeMap<String, SmithingRecipe>,
}

impl SmithingRecipeBook {
    /// Empty recipe book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load recipes from a JSON file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read recipe file {}", path.display()))?;
        Self::load_from_str(&content)
    }

    /// Load recipes from a JSON array string.
    pub fn load_from_str(content: &str) -> Result<Self> {
        let recipes: Vec<SmithingRecipe> =
            serde_json::from_str(content).context("Failed to parse smithing recipe JSON")?;

        let mut book = Self::new();
        for recipe in recipes {
            book.add_recipe(recipe);
        }
        Ok(book)
    }

    /// Add a recipe, replacing any earlier recipe with the same id.
    pub fn add_recipe(&mut self, recipe: SmithingRecipe) {
        if let Some(previous) = self.recipes.insert(recipe.id.clone(), recipe) {
            tracing::debug!(id = %previous.id, "smithing recipe redefined");
        }
    }

    /// Look up a recipe by id.
    pub fn get_recipe(&self, id: &str) -> Option<&SmithingRecipe> {
        self.recipes.get(id)
    }

    /// All recipes in id order.
    pub fn all_recipes(&self) -> impl Iterator<Item = &SmithingRecipe> {
        self.recipes.values()
    }

    /// Number of registered recipes.
    pub fn recipe_count(&self) -> usize {
        self.recipes.len()
    }

    /// The first recipe matching `input`, in id order.
    pub fn find(&self, input: &SmithingInput) -> Option<&SmithingRecipe> {
        self.recipes.values().find(|recipe| recipe.matches(input))
    }

    /// Netherite upgrades for the diamond tool and armor set.
    pub fn with_defaults() -> Self {
        let mut book = Self::new();
        let key = |path: &str| ItemKey::parse(path).expect("built-in item keys are valid");
        let template = key("netherite_upgrade_smithing_template");
        let ingot = key("netherite_ingot");

        for piece in [
            "sword",
            "pickaxe",
            "axe",
            "shovel",
            "hoe",
            "helmet",
            "chestplate",
            "leggings",
            "boots",
        ] {
            book.add_recipe(SmithingRecipe {
                id: format!("netherite_{piece}"),
                template: template.clone(),
                base: key(&format!("diamond_{piece}")),
                addition: ingot.clone(),
                result: key(&format!("netherite_{piece}")),
            });
        }

        book
    }
}

impl RecipeSource for SmithingRecipeBook {
    fn match_smithing(&self, input: &SmithingInput) -> Option<ItemStack> {
        self.find(input)
            .map(|recipe| ItemStack::new(recipe.result.clone(), 1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(path: &str) -> ItemKey {
        ItemKey::parse(path).unwrap()
    }

    fn input(template: &str, base: &str, addition: &str) -> SmithingInput {
        SmithingInput {
            template: key(template),
            base: key(base),
            addition: key(addition),
        }
    }

    #[test]
    fn defaults_upgrade_diamond_gear() {
        let book = SmithingRecipeBook::with_defaults();
        assert_eq!(book.recipe_count(), 9);

        let result = book
            .match_smithing(&input(
                "netherite_upgrade_smithing_template",
                "diamond_chestplate",
                "netherite_ingot",
            ))
            .expect("upgrade matches");
        assert_eq!(result, ItemStack::new(key("netherite_chestplate"), 1));
    }

    #[test]
    fn matching_is_role_sensitive() {
        let book = SmithingRecipeBook::with_defaults();
        assert!(book
            .match_smithing(&input(
                "diamond_sword",
                "netherite_upgrade_smithing_template",
                "netherite_ingot",
            ))
            .is_none());
        assert!(book
            .match_smithing(&input(
                "netherite_upgrade_smithing_template",
                "iron_sword",
                "netherite_ingot",
            ))
            .is_none());
    }

    #[test]
    fn loads_recipes_from_json() {
        let json = r#"[
            {
                "id": "coast_trim_iron_chestplate",
                "template": "coast_armor_trim_smithing_template",
                "base": "iron_chestplate",
                "addition": "mdm:emerald",
                "result": "trimmed/iron_chestplate_coast_emerald"
            }
        ]"#;
        let book = SmithingRecipeBook::load_from_str(json).expect("valid json");
        assert_eq!(book.recipe_count(), 1);
        let recipe = book.get_recipe("coast_trim_iron_chestplate").unwrap();
        assert_eq!(recipe.addition, key("emerald"));
        assert!(recipe.matches(&input(
            "coast_armor_trim_smithing_template",
            "iron_chestplate",
            "emerald",
        )));
    }

    #[test]
    fn rejects_invalid_item_keys() {
        let json = r#"[{"id": "bad", "template": "Bad Key", "base": "a", "addition": "b", "result": "c"}]"#;
        let err = SmithingRecipeBook::load_from_str(json).unwrap_err();
        assert!(format!("{err:#}").contains("smithing recipe JSON"));
    }

    #[test]
    fn redefinition_replaces_recipe() {
        let mut book = SmithingRecipeBook::new();
        let mut recipe = SmithingRecipe {
            id: "upgrade".into(),
            template: key("t"),
            base: key("b"),
            addition: key("a"),
            result: key("r1"),
        };
        book.add_recipe(recipe.clone());
        recipe.result = key("r2");
        book.add_recipe(recipe);
        assert_eq!(book.recipe_count(), 1);
        assert_eq!(book.get_recipe("upgrade").unwrap().result, key("r2"));
    }

    #[test]
    fn input_requires_all_slots() {
        let mut slots = SlotStore::new();
        slots.set(0, key("t"), 1).unwrap();
        slots.set(1, key("b"), 1).unwrap();
        assert!(SmithingInput::from_slots(&slots).is_none());
        slots.set(2, key("a"), 1).unwrap();
        assert_eq!(SmithingInput::from_slots(&slots), Some(input("t", "b", "a")));
    }
}
