use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use strsim::damerau_levenshtein;
use unicode_normalization::UnicodeNormalization;

/// Skill alias -> canonical form mapping (O(1) lookup).
static ALIAS_TO_CANONICAL: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    let aliases: &[(&str, &[&str])] = &[
        // Languages
        (
            "javascript",
            &["js", "javascript", "java script", "ecmascript", "es6"],
        ),
        ("typescript", &["ts", "typescript", "type script"]),
        ("python", &["python3", "python 3", "py", "python"]),
        ("java", &["java8", "java11", "java17", "openjdk", "java"]),
        ("csharp", &["c#", "c sharp", "csharp", ".net", "dotnet"]),
        ("golang", &["go", "golang", "go lang"]),
        ("rust", &["rust lang", "rust language", "rust"]),
        ("sql", &["sql", "structured query language"]),
        ("html", &["html", "html5"]),
        ("css", &["css", "css3", "cascading style sheets"]),
        // Frontend frameworks
        ("react", &["reactjs", "react.js", "react js", "react"]),
        ("vue", &["vue.js", "vuejs", "vue js", "vue"]),
        ("angular", &["angularjs", "angular.js", "angular"]),
        ("nextjs", &["next.js", "nextjs", "next js"]),
        // Backend frameworks
        ("nodejs", &["node.js", "node js", "nodejs", "node"]),
        ("django", &["django rest framework", "drf", "django"]),
        ("flask", &["flask framework", "python flask", "flask"]),
        ("spring", &["spring boot", "springboot", "spring"]),
        ("rails", &["ruby on rails", "ror", "rails"]),
        // Data / ML
        ("pandas", &["python pandas", "pandas"]),
        ("numpy", &["numerical python", "numpy"]),
        ("tensorflow", &["tensor flow", "tf", "tensorflow"]),
        ("pytorch", &["torch", "py torch", "pytorch"]),
        (
            "machinelearning",
            &["machine learning", "ml", "machinelearning"],
        ),
        ("datascience", &["data science", "datascience"]),
        ("excel", &["microsoft excel", "ms excel", "excel"]),
        ("tableau", &["tableau desktop", "tableau"]),
        ("powerbi", &["power bi", "powerbi"]),
        // Databases
        ("postgresql", &["postgres", "pg", "postgresql"]),
        ("mysql", &["my sql", "mysql", "mariadb"]),
        ("mongodb", &["mongo", "mongo db", "mongodb"]),
        ("redis", &["redis cache", "redis"]),
        // Cloud / DevOps
        ("aws", &["amazon web services", "amazon aws", "aws"]),
        ("gcp", &["google cloud platform", "google cloud", "gcp"]),
        ("azure", &["microsoft azure", "ms azure", "azure"]),
        ("docker", &["containerization", "docker container", "docker"]),
        ("kubernetes", &["k8s", "kube", "kubernetes"]),
        ("git", &["version control", "github", "gitlab", "git"]),
        // Design / product
        ("figma", &["figma design", "figma"]),
        ("uxdesign", &["ux design", "user experience", "ux", "uxdesign"]),
        ("uidesign", &["ui design", "user interface", "ui", "uidesign"]),
        // Marketing / business
        ("seo", &["search engine optimization", "seo"]),
        (
            "socialmedia",
            &["social media marketing", "social media", "socialmedia"],
        ),
        ("copywriting", &["copy writing", "copywriting"]),
        (
            "projectmanagement",
            &["project management", "pm", "projectmanagement"],
        ),
    ];

    let mut map = HashMap::new();
    for (canonical, alias_list) in aliases {
        map.insert(*canonical, *canonical);
        for alias in *alias_list {
            map.insert(*alias, *canonical);
        }
    }
    map
});

/// Skill groups used for "related skill" partial credit: two canonical skills
/// are related when they appear in the same group. Read-only configuration
/// data, loaded once at startup.
static SKILL_GROUPS: LazyLock<Vec<(&'static str, HashSet<&'static str>)>> = LazyLock::new(|| {
    let groups: &[(&str, &[&str])] = &[
        (
            "frontend",
            &["react", "vue", "angular", "nextjs", "html", "css", "javascript", "typescript"],
        ),
        (
            "backend",
            &["nodejs", "django", "flask", "spring", "rails", "golang", "rust", "java", "csharp"],
        ),
        (
            "data",
            &["python", "sql", "pandas", "numpy", "excel", "tableau", "powerbi", "datascience"],
        ),
        (
            "ml",
            &["python", "tensorflow", "pytorch", "machinelearning", "datascience"],
        ),
        (
            "databases",
            &["sql", "postgresql", "mysql", "mongodb", "redis"],
        ),
        ("cloud", &["aws", "gcp", "azure", "docker", "kubernetes"]),
        ("design", &["figma", "uxdesign", "uidesign"]),
        (
            "marketing",
            &["seo", "socialmedia", "copywriting"],
        ),
    ];

    groups
        .iter()
        .map(|(name, members)| (*name, members.iter().copied().collect()))
        .collect()
});

/// Industry adjacency for the mid-tier category score. Symmetric by
/// construction: adjacency is checked in both directions.
static INDUSTRY_ADJACENCY: LazyLock<HashMap<&'static str, HashSet<&'static str>>> =
    LazyLock::new(|| {
        let pairs: &[(&str, &[&str])] = &[
            ("software", &["fintech", "edtech", "healthtech", "ecommerce"]),
            ("fintech", &["software", "finance", "banking"]),
            ("finance", &["fintech", "banking", "consulting"]),
            ("banking", &["finance", "fintech"]),
            ("edtech", &["software", "education"]),
            ("education", &["edtech", "nonprofit"]),
            ("healthtech", &["software", "healthcare"]),
            ("healthcare", &["healthtech", "biotech"]),
            ("biotech", &["healthcare", "research"]),
            ("ecommerce", &["software", "retail", "marketing"]),
            ("retail", &["ecommerce", "logistics"]),
            ("marketing", &["ecommerce", "media", "advertising"]),
            ("media", &["marketing", "advertising", "entertainment"]),
            ("advertising", &["marketing", "media"]),
            ("consulting", &["finance", "software"]),
            ("logistics", &["retail", "ecommerce"]),
            ("nonprofit", &["education"]),
            ("research", &["biotech"]),
            ("entertainment", &["media"]),
        ];

        pairs
            .iter()
            .map(|(name, adjacent)| (*name, adjacent.iter().copied().collect()))
            .collect()
    });

/// Alias map keyed by separator-stripped NFKC forms, for tolerating light
/// formatting drift ("React JS", "node.js").
static COMPACT_ALIAS_TO_CANONICAL: LazyLock<HashMap<String, &'static str>> = LazyLock::new(|| {
    let mut map = HashMap::new();
    for (alias, canonical) in ALIAS_TO_CANONICAL.iter() {
        map.entry(compact_key(alias)).or_insert(*canonical);
    }
    map
});

fn nfkc_lower_trim(input: &str) -> String {
    input.nfkc().collect::<String>().trim().to_lowercase()
}

fn compact_key(input: &str) -> String {
    input
        .nfkc()
        .collect::<String>()
        .to_lowercase()
        .chars()
        .filter(|c| !matches!(c, ' ' | '.' | '-' | '_' | '/' | ','))
        .collect()
}

fn match_canonical_token(token: &str) -> Option<String> {
    if token.is_empty() {
        return None;
    }

    if let Some(canonical) = ALIAS_TO_CANONICAL.get(token) {
        return Some((*canonical).to_string());
    }

    let compact = compact_key(token);
    if let Some(canonical) = COMPACT_ALIAS_TO_CANONICAL.get(&compact) {
        return Some((*canonical).to_string());
    }

    fuzzy_match_canonical(&compact)
}

fn fuzzy_match_canonical(compact: &str) -> Option<String> {
    if compact.len() < 5 {
        return None;
    }

    let mut best: Option<(&str, usize)> = None;
    for (alias, canonical) in COMPACT_ALIAS_TO_CANONICAL.iter() {
        // Short aliases and short canonical targets are matched only via the
        // exact lookups above; fuzzing them produces false positives on brief
        // inputs ("javaa" must not become "java").
        if alias.len() < 5 || canonical.len() < 5 {
            continue;
        }

        let distance = damerau_levenshtein(compact, alias);
        if distance == 0 {
            return Some((*canonical).to_string());
        }

        let len = compact.len().max(alias.len());
        let acceptable = distance == 1 || (len >= 8 && distance == 2);
        if !acceptable {
            continue;
        }

        match best {
            None => best = Some((*canonical, distance)),
            Some((_, best_dist)) if distance < best_dist => best = Some((*canonical, distance)),
            _ => {}
        }
    }

    best.map(|(canonical, _)| canonical.to_string())
}

/// Canonicalize one skill or industry term.
pub fn normalize_term(term: &str) -> String {
    let normalized = nfkc_lower_trim(term);
    match match_canonical_token(&normalized) {
        Some(canonical) => canonical,
        None => normalized,
    }
}

/// Canonicalize a list of terms into a de-duplicated set, dropping blanks.
pub fn normalize_term_set(terms: &[String]) -> HashSet<String> {
    terms
        .iter()
        .filter(|t| !t.trim().is_empty())
        .map(|t| normalize_term(t))
        .collect()
}

/// True when two canonical skills co-occur in at least one skill group.
pub fn skills_related(a: &str, b: &str) -> bool {
    if a == b {
        return true;
    }
    SKILL_GROUPS
        .iter()
        .any(|(_, members)| members.contains(a) && members.contains(b))
}

/// True when the subject set carries any skill related to `skill`.
pub fn has_related_skill(skill: &str, subject_skills: &HashSet<String>) -> bool {
    subject_skills.iter().any(|s| skills_related(skill, s))
}

/// True when two canonical industries are taxonomy-adjacent.
pub fn industries_adjacent(a: &str, b: &str) -> bool {
    let forward = INDUSTRY_ADJACENCY
        .get(a)
        .is_some_and(|set| set.contains(b));
    let backward = INDUSTRY_ADJACENCY
        .get(b)
        .is_some_and(|set| set.contains(a));
    forward || backward
}
