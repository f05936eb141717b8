use crate::domain::model::{Category, Taxonomy};

/// Parses a category listing where every unindented line names a category and
/// every `- name` line below it adds a subcategory.
///
/// Subcategories seen before any category have no owner and are dropped.
/// Repeating a category name appends to the existing entry, and a
/// subcategory already owned by another category is skipped so that each
/// subcategory keeps a single owner.
pub fn parse_taxonomy(content: &str) -> Taxonomy {
    let mut categories: Vec<Category> = Vec::new();
    let mut current: Option<usize> = None;

    for (line_no, raw) in content.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('-') {
            let name = line.trim_start_matches(['-', ' ']).trim_end();
            let Some(index) = current else {
                tracing::debug!("Line {}: subcategory '{}' has no category, dropped", line_no + 1, name);
                continue;
            };
            if name.is_empty() {
                tracing::debug!("Line {}: empty subcategory ignored", line_no + 1);
                continue;
            }
            if let Some(owner) = categories
                .iter()
                .find(|c| c.subcategories.iter().any(|s| s == name))
            {
                tracing::warn!(
                    "Subcategory '{}' already listed under '{}', skipping duplicate",
                    name,
                    owner.name
                );
                continue;
            }
            categories[index].subcategories.push(name.to_string());
        } else {
            current = Some(match categories.iter().position(|c| c.name == line) {
                Some(existing) => existing,
                None => {
                    categories.push(Category {
                        name: line.to_string(),
                        subcategories: Vec::new(),
                    });
                    categories.len() - 1
                }
            });
        }
    }

    Taxonomy::from_categories(categories)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_categories_with_their_subcategories() {
        let taxonomy = parse_taxonomy(
            "Repairs & Maintenance\n- Linens, Soaps, & Other Consumables\nAdmin & Other\n- Software Subscriptions\n",
        );

        assert_eq!(taxonomy.category_count(), 2);
        assert_eq!(
            taxonomy.category("Repairs & Maintenance").unwrap().subcategories,
            vec!["Linens, Soaps, & Other Consumables".to_string()]
        );
        assert_eq!(
            taxonomy.category("Admin & Other").unwrap().subcategories,
            vec!["Software Subscriptions".to_string()]
        );
        assert_eq!(taxonomy.categories()[0].name, "Repairs & Maintenance");
    }

    #[test]
    fn indentation_and_blank_lines_are_ignored() {
        let taxonomy = parse_taxonomy(
            "\nUtilities\n    - Electric\n  -  Water\n\n\nInsurance\n\t- Landlord Policy\n",
        );

        let flat = taxonomy.flattened();
        assert_eq!(
            flat,
            vec![
                ("Electric", "Utilities"),
                ("Water", "Utilities"),
                ("Landlord Policy", "Insurance"),
            ]
        );
    }

    #[test]
    fn orphan_subcategories_are_dropped() {
        let taxonomy = parse_taxonomy("- Orphan\n- Another\nTaxes\n- Property Taxes\n");

        assert_eq!(taxonomy.subcategory_count(), 1);
        assert!(!taxonomy.contains_subcategory("Orphan"));
        assert_eq!(taxonomy.category_of("Property Taxes"), Some("Taxes"));
    }

    #[test]
    fn flattened_length_matches_per_category_sum() {
        let taxonomy = parse_taxonomy(
            "A\n- a1\n- a2\nB\nC\n- c1\n- c2\n- c3\n",
        );

        let per_category: usize = taxonomy
            .categories()
            .iter()
            .map(|c| c.subcategories.len())
            .sum();
        assert_eq!(taxonomy.flattened().len(), per_category);
        assert_eq!(per_category, 5);
        assert!(taxonomy.category("B").unwrap().subcategories.is_empty());
    }

    #[test]
    fn repeated_category_appends_and_duplicate_subcategory_keeps_first_owner() {
        let taxonomy = parse_taxonomy("A\n- x\nB\n- x\n- y\nA\n- z\n");

        assert_eq!(taxonomy.category_count(), 2);
        assert_eq!(taxonomy.category("A").unwrap().subcategories, vec!["x", "z"]);
        assert_eq!(taxonomy.category("B").unwrap().subcategories, vec!["y"]);
    }

    #[test]
    fn empty_input_gives_empty_taxonomy() {
        assert!(parse_taxonomy("").is_empty());
        assert!(parse_taxonomy("\n\n   \n").is_empty());
    }
}
