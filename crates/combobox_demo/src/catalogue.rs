//! Built-in option lists.

use combobox::{DropdownOption, OptionKind};

const PRODUCTS: &[(i64, &str, &str)] = &[
    (1, "iPhone 9", "smartphones"),
    (2, "iPhone X", "smartphones"),
    (3, "Samsung Universe 9", "smartphones"),
    (4, "OPPO F19", "smartphones"),
    (5, "Huawei P30", "smartphones"),
    (6, "MacBook Pro", "laptops"),
    (7, "Samsung Galaxy Book", "laptops"),
    (8, "Microsoft Surface Laptop 4", "laptops"),
    (9, "Infinix INBOOK", "laptops"),
    (10, "HP Pavilion 15-DK1056WM", "laptops"),
    (11, "Perfume Oil", "fragrances"),
    (12, "Brown Perfume", "fragrances"),
    (13, "Fog Scent Xpressio Perfume", "fragrances"),
    (14, "Non-Alcoholic Concentrated Perfume Oil", "fragrances"),
    (15, "Eau De Perfume Spray", "fragrances"),
    (16, "Hyaluronic Acid Serum", "skincare"),
    (17, "Tree Oil 30ml", "skincare"),
    (18, "Oil Free Moisturizer 100ml", "skincare"),
    (19, "Skin Beauty Serum.", "skincare"),
    (20, "Freckle Treatment Cream- 15gm", "skincare"),
    (21, "Daal Masoor 500 grams", "groceries"),
    (22, "Elbow Macaroni - 400 gm", "groceries"),
    (23, "Orange Essence Food Flavou", "groceries"),
    (24, "Cereals muesli fruit nuts", "groceries"),
    (25, "Gulab Powder 50 Gram", "groceries"),
];

const HELP_TOPICS: &[(&str, &str)] = &[
    ("returns", "How do I return a product?"),
    ("shipping", "How long does shipping take?"),
    ("warranty", "Is my phone under warranty?"),
];

/// Products plus a few help-center questions, for offline search.
pub fn products() -> Vec<DropdownOption> {
    let items = PRODUCTS.iter().map(|&(id, title, category)| {
        DropdownOption::new(id.to_string(), title)
            .with_id(id)
            .with_category(category)
            .with_kind(OptionKind::Product)
    });
    let help = HELP_TOPICS.iter().map(|&(value, question)| {
        DropdownOption::new(value, question).with_kind(OptionKind::Query)
    });
    items.chain(help).collect()
}

fn simple(pairs: &[(&str, &str)]) -> Vec<DropdownOption> {
    pairs
        .iter()
        .map(|&(value, label)| DropdownOption::new(value, label).with_kind(OptionKind::Option))
        .collect()
}

pub fn departments() -> Vec<DropdownOption> {
    simple(&[
        ("eng", "Engineering"),
        ("design", "Design"),
        ("product", "Product Management"),
        ("marketing", "Marketing"),
        ("sales", "Sales"),
        ("support", "Customer Support"),
        ("finance", "Finance"),
        ("hr", "People & HR"),
    ])
}

pub fn offices() -> Vec<DropdownOption> {
    simple(&[
        ("ber", "Berlin"),
        ("lis", "Lisbon"),
        ("nyc", "New York"),
        ("sfo", "San Francisco"),
        ("sgp", "Singapore"),
        ("syd", "Sydney"),
        ("tor", "Toronto"),
        ("remote", "Remote"),
    ])
}

pub fn skills() -> Vec<DropdownOption> {
    simple(&[
        ("rust", "Rust"),
        ("go", "Go"),
        ("python", "Python"),
        ("typescript", "TypeScript"),
        ("sql", "SQL"),
        ("k8s", "Kubernetes"),
        ("terraform", "Terraform"),
        ("figma", "Figma"),
        ("writing", "Technical Writing"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_are_unique() {
        for list in [products(), departments(), offices(), skills()] {
            let mut values: Vec<_> = list.iter().map(|o| o.value().to_string()).collect();
            let total = values.len();
            values.sort();
            values.dedup();
            assert_eq!(values.len(), total);
        }
    }

    #[test]
    fn test_help_topics_are_queries() {
        let queries = products()
            .into_iter()
            .filter(|o| o.kind() == Some(OptionKind::Query))
            .count();
        assert_eq!(queries, HELP_TOPICS.len());
    }
}
