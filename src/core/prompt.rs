use crate::core::transactions::format_amount;
use crate::domain::model::Taxonomy;

/// Disambiguation rules the model reads. Wording matters to the model, keep it as is.
pub const CATEGORIZATION_RULES: &str = r#"Rules:
1. "MICHAEL SHEETS" or "MICHAEL G" transactions are mortgage-related
2. "JONATHAN" or "JONATHAN SHEETS" transactions are:
   - negative amount = Owner Distributions
   - positive amount = Owner Contributions
3. AIRBNB/VRBO income = Short Term Rents
4. Utilities go under specific utility subcategories
5. Choose specific repair subcategories when possible
6. Transactions under $200 from grocery or retail stores (like Meijer, Target, Trader Joe's, Walmart) 
   should be categorized as "Linens, Soaps, & Other Consumables" under Repairs & Maintenance
7. Any "M2M" transactions follow the same rule as Jonathan's transactions:
   - negative amount = Owner Distributions
   - positive amount = Owner Contributions
8. Any recurring streaming or subscription services (like Netflix, YouTube TV, Showtime, Disney+, etc.) 
   should be categorized as "Software Subscriptions" under Admin & Other"#;

pub const ANSWER_DIRECTIVE: &str =
    "IMPORTANT: Return ONLY the subcategory name, with no explanation or additional text.";

/// One `- <subcategory> (under <category>)` line per taxonomy entry.
pub fn render_subcategory_list(taxonomy: &Taxonomy) -> String {
    taxonomy
        .flattened()
        .into_iter()
        .map(|(subcategory, category)| format!("- {} (under {})\n", subcategory, category))
        .collect()
}

/// Renders the single instruction sent to the model for one transaction.
pub fn build_prompt(description: &str, amount: f64, taxonomy: &Taxonomy) -> String {
    format!(
        "You are a transaction categorization system. Given this transaction:\n\
         Description: \"{description}\"\n\
         Amount: ${amount}\n\
         \n\
         Categorize it into exactly one of these subcategories:\n\
         {listing}\n\
         \n\
         {rules}\n\
         \n\
         {directive}",
        description = description,
        amount = format_amount(amount),
        listing = render_subcategory_list(taxonomy),
        rules = CATEGORIZATION_RULES,
        directive = ANSWER_DIRECTIVE,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::taxonomy::parse_taxonomy;

    fn taxonomy() -> Taxonomy {
        parse_taxonomy(
            "Repairs & Maintenance\n- Linens, Soaps, & Other Consumables\nAdmin & Other\n- Software Subscriptions\n",
        )
    }

    #[test]
    fn prompt_contains_transaction_details() {
        let prompt = build_prompt("NETFLIX.COM", -15.99, &taxonomy());

        assert!(prompt.starts_with(
            "You are a transaction categorization system. Given this transaction:\nDescription: \"NETFLIX.COM\"\nAmount: $-15.99\n"
        ));
    }

    #[test]
    fn prompt_lists_every_subcategory_with_owner() {
        let prompt = build_prompt("MEIJER", 45.0, &taxonomy());

        assert!(prompt.contains(
            "Categorize it into exactly one of these subcategories:\n\
             - Linens, Soaps, & Other Consumables (under Repairs & Maintenance)\n\
             - Software Subscriptions (under Admin & Other)\n\n"
        ));
        assert!(prompt.contains("Amount: $45.0\n"));
    }

    #[test]
    fn prompt_carries_all_eight_rules_and_ends_with_directive() {
        let prompt = build_prompt("M2M TRANSFER", 500.0, &taxonomy());

        assert!(prompt.contains(CATEGORIZATION_RULES));
        for n in 1..=8 {
            assert!(prompt.contains(&format!("\n{}. ", n)), "rule {} missing", n);
        }
        assert!(prompt.ends_with(ANSWER_DIRECTIVE));
    }

    #[test]
    fn prompt_is_deterministic() {
        let t = taxonomy();
        assert_eq!(build_prompt("X", 1.5, &t), build_prompt("X", 1.5, &t));
    }

    #[test]
    fn empty_taxonomy_renders_empty_listing() {
        assert_eq!(render_subcategory_list(&Taxonomy::default()), "");
    }
}
