//! Schema registry: dimension definitions and categorical label mappings
//!
//! Everything here is static data. Column identifiers are exactly the header
//! names found in the survey workbook, including the irregular spacing
//! (`Item 8` for dimension items, `Item4` for relational items, and the
//! lone `Item21` inside Valorization).

use serde::Serialize;

/// Participant identifier column (opaque, unused in analysis)
pub const ID_COLUMN: &str = "id_participants";

/// Relationship duration in months
pub const DURATION_COLUMN: &str = "Item5";

/// Derived column holding the coarse satisfaction grouping
pub const SATISFACTION_GROUP_COLUMN: &str = "Satisfaction_group";

/// Row key used for the duration line of the means table
pub const DURATION_MEANS_KEY: &str = "Item5 (Durée relation)";

/// One psychometric dimension: its items, precomputed total and prompts
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Dimension {
    /// Display name ("Estime de Soi")
    pub name: &'static str,
    /// Short key ("ES")
    pub short_name: &'static str,
    pub description: &'static str,
    /// What the scale measures
    pub summary: &'static str,
    /// Lowest and highest possible total score
    pub score_range: (u32, u32),
    /// Whether a higher total is the favourable end of the scale
    pub higher_is_better: bool,
    /// Item column identifiers in questionnaire order
    pub items: &'static [&'static str],
    /// Column holding the precomputed total score
    pub total: &'static str,
    /// Item column → prompt text
    pub item_labels: &'static [(&'static str, &'static str)],
}

impl Dimension {
    /// Prompt text for an item of this dimension
    pub fn item_label(&self, item: &str) -> Option<&'static str> {
        self.item_labels
            .iter()
            .find(|(id, _)| *id == item)
            .map(|(_, label)| *label)
    }

    pub fn contains_item(&self, item: &str) -> bool {
        self.items.contains(&item)
    }
}

pub const ESTIME_DE_SOI: Dimension = Dimension {
    name: "Estime de Soi",
    short_name: "ES",
    description: "Estime de Soi (Rosenberg)",
    summary: "Mesure l'évaluation globale qu'une personne fait d'elle-même",
    score_range: (10, 40),
    higher_is_better: true,
    items: &[
        "Item 8", "Item 9", "Item 10", "Item 11", "Item 12", "Item 13", "Item 14", "Item 15",
        "Item 16", "Item 17",
    ],
    total: "Total ES",
    item_labels: &[
        ("Item 8", "Je pense que je suis une personne de valeur"),
        ("Item 9", "Je possède un certain nombre de belles qualités"),
        ("Item 10", "Je me considère comme un(e) raté(e) (inversé)"),
        ("Item 11", "Je suis capable de faire les choses aussi bien que les autres"),
        ("Item 12", "Peu de raisons d'être fier(ère) de moi (inversé)"),
        ("Item 13", "J'ai une attitude positive vis-à-vis de moi-même"),
        ("Item 14", "Je suis satisfait(e) de moi"),
        ("Item 15", "J'aimerais avoir plus de respect pour moi-même (inversé)"),
        ("Item 16", "Je me sens vraiment inutile (inversé)"),
        ("Item 17", "Je suis un(e) bon(ne) à rien (inversé)"),
    ],
};

pub const VALORISATION: Dimension = Dimension {
    name: "Valorisation",
    short_name: "Valorisation",
    description: "Valorisation dans la relation",
    summary: "Évalue dans quelle mesure la personne se sent valorisée et appréciée par son/sa partenaire",
    score_range: (5, 25),
    higher_is_better: true,
    items: &["Item 18", "Item 19", "Item 20", "Item21", "Item 22"],
    total: "Total valo",
    item_labels: &[
        ("Item 18", "Mon/ma partenaire me fait sentir que j'ai de la valeur"),
        ("Item 19", "Je me sens apprécié(e) pour ce que je suis"),
        ("Item 20", "Mon/ma partenaire reconnaît mes efforts et qualités"),
        ("Item21", "Mon/ma partenaire m'encourage à être moi-même"),
        ("Item 22", "Être avec mon/ma partenaire renforce ma confiance"),
    ],
};

pub const MANQUE_RECONNAISSANCE: Dimension = Dimension {
    name: "Manque de Reconnaissance",
    short_name: "MR",
    description: "Manque de Reconnaissance",
    summary: "Mesure les sentiments de négligence ou de manque de considération dans la relation",
    score_range: (6, 30),
    higher_is_better: false,
    items: &["Item 23", "Item 24", "Item 25", "Item 26", "Item 27", "Item 28"],
    total: "Total MR",
    item_labels: &[
        ("Item 23", "Je me sens parfois mis(e) de côté ou peu écouté(e)"),
        ("Item 24", "Mon/ma partenaire ne remarque pas ce que je fais"),
        ("Item 25", "Je me sens parfois négligé(e) ou peu considéré(e)"),
        ("Item 26", "Mon/ma partenaire me critique plus qu'il/elle ne me valorise"),
        ("Item 27", "Le comportement de mon/ma partenaire me fait douter"),
        ("Item 28", "Je ressens un déséquilibre entre ce que je donne et reçois"),
    ],
};

pub const GESTION_CONFLITS: Dimension = Dimension {
    name: "Gestion des Conflits",
    short_name: "GC",
    description: "Gestion des Conflits",
    summary: "Évalue la qualité de la communication et de la résolution des désaccords dans le couple",
    score_range: (6, 30),
    higher_is_better: true,
    items: &["Item 29", "Item 30", "Item 31", "Item 32", "Item 33", "Item 34"],
    total: "Total GC",
    item_labels: &[
        ("Item 29", "Lors de nos désaccords, nous communiquons sans nous blesser"),
        ("Item 30", "Après un conflit, je me sens respecté(e) et compris(e)"),
        ("Item 31", "Les disputes me font parfois douter de moi-même (inversé)"),
        ("Item 32", "Nos désaccords nous aident à mieux nous comprendre"),
        ("Item 33", "Mon/ma partenaire cherche plus à avoir raison (inversé)"),
        ("Item 34", "Nos désaccords me donnent le sentiment d'être incompris(e) (inversé)"),
    ],
};

/// The four dimensions in presentation order
pub const DIMENSIONS: [Dimension; 4] = [
    ESTIME_DE_SOI,
    VALORISATION,
    MANQUE_RECONNAISSANCE,
    GESTION_CONFLITS,
];

/// Look up a dimension by short name or display name (case-insensitive)
pub fn dimension(key: &str) -> Option<&'static Dimension> {
    DIMENSIONS.iter().find(|d| {
        d.short_name.eq_ignore_ascii_case(key) || d.name.eq_ignore_ascii_case(key)
    })
}

/// Total columns of all dimensions, in presentation order
pub fn total_columns() -> Vec<&'static str> {
    DIMENSIONS.iter().map(|d| d.total).collect()
}

/// Every dimension item, in presentation order
pub fn all_items() -> Vec<&'static str> {
    DIMENSIONS.iter().flat_map(|d| d.items.iter().copied()).collect()
}

/// Dimension owning an item column
pub fn dimension_of_item(item: &str) -> Option<&'static Dimension> {
    DIMENSIONS.iter().find(|d| d.contains_item(item))
}

/// Prompt text for any dimension item
pub fn item_label(item: &str) -> Option<&'static str> {
    dimension_of_item(item).and_then(|d| d.item_label(item))
}

// ========================================
// Categorical variables
// ========================================

/// Coded categorical column with its label mapping
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CategoricalVariable {
    /// Source column holding the integer code
    pub column: &'static str,
    /// Derived column receiving the label
    pub label_column: &'static str,
    /// Human-readable variable name
    pub title: &'static str,
    /// Code → label, in canonical ascending order
    pub mapping: &'static [(i64, &'static str)],
}

impl CategoricalVariable {
    pub fn label_for(&self, code: i64) -> Option<&'static str> {
        self.mapping
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }

    pub fn accepts(&self, code: i64) -> bool {
        self.label_for(code).is_some()
    }

    /// Labels in canonical code order (used as explicit group ordering)
    pub fn ordered_labels(&self) -> Vec<&'static str> {
        self.mapping.iter().map(|(_, label)| *label).collect()
    }
}

pub const AGE: CategoricalVariable = CategoricalVariable {
    column: "Age",
    label_column: "Age_label",
    title: "Âge",
    mapping: &[(1, "18-20 ans"), (2, "20-25 ans")],
};

pub const GENRE: CategoricalVariable = CategoricalVariable {
    column: "Genre",
    label_column: "Genre_label",
    title: "Genre",
    mapping: &[(1, "Femme"), (2, "Homme"), (3, "Autre")],
};

pub const ETUDE: CategoricalVariable = CategoricalVariable {
    column: "Etude",
    label_column: "Etude_label",
    title: "Niveau d'études",
    mapping: &[
        (1, "Lycée"),
        (2, "Licence 1"),
        (3, "Licence 2"),
        (4, "Licence 3"),
        (5, "Master ou plus"),
    ],
};

pub const SITUATION: CategoricalVariable = CategoricalVariable {
    column: "Item4",
    label_column: "Item4_label",
    title: "Situation actuelle",
    mapping: &[(1, "En couple"), (2, "Autre")],
};

pub const COHABITATION: CategoricalVariable = CategoricalVariable {
    column: "Item6",
    label_column: "Item6_label",
    title: "Cohabitation",
    mapping: &[(1, "Oui"), (2, "Non")],
};

pub const SATISFACTION: CategoricalVariable = CategoricalVariable {
    column: "Item7",
    label_column: "Item7_label",
    title: "Satisfaction relationnelle",
    mapping: &[
        (1, "Très insatisfaisante"),
        (2, "Plutôt insatisfaisante"),
        (3, "Plutôt satisfaisante"),
        (4, "Très satisfaisante"),
    ],
};

/// Variables the labeler derives label columns for
pub const LABELED_VARIABLES: [CategoricalVariable; 6] =
    [AGE, GENRE, ETUDE, SITUATION, COHABITATION, SATISFACTION];

/// Find a categorical variable by its code column or label column
pub fn categorical(column: &str) -> Option<&'static CategoricalVariable> {
    LABELED_VARIABLES
        .iter()
        .find(|v| v.column == column || v.label_column == column)
}

/// Canonical group ordering for a grouping column, when one exists
///
/// Label columns order by code (education: Lycée < Licence 1 < ... <
/// Master ou plus); code columns order numerically; the satisfaction
/// grouping orders unsatisfied first.
pub fn canonical_order(column: &str) -> Option<Vec<String>> {
    if column == SATISFACTION_GROUP_COLUMN {
        return Some(vec!["Insatisfait".to_string(), "Satisfait".to_string()]);
    }
    let var = categorical(column)?;
    if column == var.label_column {
        Some(var.ordered_labels().into_iter().map(String::from).collect())
    } else {
        Some(var.mapping.iter().map(|(code, _)| code.to_string()).collect())
    }
}

/// Coarse satisfaction grouping for a satisfaction code
pub fn satisfaction_group(code: i64) -> Option<&'static str> {
    match code {
        1 | 2 => Some("Insatisfait"),
        3 | 4 => Some("Satisfait"),
        _ => None,
    }
}

// ========================================
// Likert scales and relational items
// ========================================

/// 5-point agreement scale used by the dimension items
pub const LIKERT_5_LABELS: [(i64, &str); 5] = [
    (1, "Pas du tout d'accord"),
    (2, "Plutôt pas d'accord"),
    (3, "Ni d'accord ni en désaccord"),
    (4, "Plutôt d'accord"),
    (5, "Tout à fait d'accord"),
];

/// 4-point scale
pub const LIKERT_4_LABELS: [(i64, &str); 4] = [
    (1, "Tout à fait en désaccord"),
    (2, "Plutôt en désaccord"),
    (3, "Plutôt en accord"),
    (4, "Tout à fait en accord"),
];

/// Relational variables (Items 4-7)
pub const RELATIONAL_ITEMS: [(&str, &str); 4] = [
    ("Item4", "Situation actuelle"),
    ("Item5", "Durée de la relation (mois)"),
    ("Item6", "Cohabitation"),
    ("Item7", "Satisfaction relationnelle"),
];

/// Columns the loader insists on: labeler sources, dimension items, totals
pub fn required_columns() -> Vec<&'static str> {
    let mut cols: Vec<&'static str> = LABELED_VARIABLES.iter().map(|v| v.column).collect();
    cols.extend(all_items());
    cols.extend(total_columns());
    cols
}
