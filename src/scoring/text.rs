//! TF-IDF text vectorizer
//!
//! Lowercased word tokens (two or more word characters), English stop words
//! removed, unigrams plus bigrams. Weights are raw counts times smoothed IDF,
//! L2-normalized per document.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::config::TextConfig;
use super::errors::{Result, ScoringError};
use super::features::FeatureVector;

static TOKEN_PATTERN: Lazy<Regex> = Lazy::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"\b\w\w+\b").expect("token pattern is valid")
});

static STOP_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against", "all", "almost",
    "alone", "along", "already", "also", "although", "always", "am", "among", "amongst", "amoungst",
    "amount", "an", "and", "another", "any", "anyhow", "anyone", "anything", "anyway", "anywhere",
    "are", "around", "as", "at", "back", "be", "became", "because", "become", "becomes", "becoming",
    "been", "before", "beforehand", "behind", "being", "below", "beside", "besides", "between",
    "beyond", "bill", "both", "bottom", "but", "by", "call", "can", "cannot", "cant", "co", "con",
    "could", "couldnt", "cry", "de", "describe", "detail", "do", "done", "down", "due", "during",
    "each", "eg", "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
    "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen", "fifty",
    "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty", "found", "four",
    "from", "front", "full", "further", "get", "give", "go", "had", "has", "hasnt", "have", "he",
    "hence", "her", "here", "hereafter", "hereby", "herein", "hereupon", "hers", "herself", "him",
    "himself", "his", "how", "however", "hundred", "i", "ie", "if", "in", "inc", "indeed",
    "interest", "into", "is", "it", "its", "itself", "keep", "last", "latter", "latterly", "least",
    "less", "ltd", "made", "many", "may", "me", "meanwhile", "might", "mill", "mine", "more",
    "moreover", "most", "mostly", "move", "much", "must", "my", "myself", "name", "namely",
    "neither", "never", "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
    "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own", "part",
    "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem", "seemed", "seeming",
    "seems", "serious", "several", "she", "should", "show", "side", "since", "sincere", "six",
    "sixty", "so", "some", "somehow", "someone", "something", "sometime", "sometimes", "somewhere",
    "still", "such", "system", "take", "ten", "than", "that", "the", "their", "them", "themselves",
    "then", "thence", "there", "thereafter", "thereby", "therefore", "therein", "thereupon",
    "these", "they", "thick", "thin", "third", "this", "those", "though", "three", "through",
    "throughout", "thru", "thus", "to", "together", "too", "top", "toward", "towards", "twelve",
    "twenty", "two", "un", "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well",
    "were", "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither", "who",
    "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without", "would", "yet",
    "you", "your", "yours", "yourself", "yourselves",
];

/// Fitted TF-IDF vectorizer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TfIdfVectorizer {
    /// Term -> column index, columns in lexicographic term order
    vocabulary: BTreeMap<String, usize>,
    /// IDF weight per column
    idf: Vec<f64>,
    n_documents: usize,
}

impl TfIdfVectorizer {
    /// Fit vocabulary and IDF over the corpus
    pub fn fit(documents: &[&str], config: &TextConfig) -> Result<Self> {
        if documents.is_empty() {
            return Err(ScoringError::Training("cannot fit vectorizer on an empty corpus".to_string()));
        }
        let n = documents.len();

        let mut doc_freq: HashMap<String, usize> = HashMap::new();
        let mut term_freq: HashMap<String, usize> = HashMap::new();
        for doc in documents {
            let terms = analyze(doc);
            let mut seen = HashSet::new();
            for term in terms {
                *term_freq.entry(term.clone()).or_insert(0) += 1;
                if seen.insert(term.clone()) {
                    *doc_freq.entry(term).or_insert(0) += 1;
                }
            }
        }

        let max_doc_count = config.max_df * n as f64;
        let mut candidates: Vec<(String, usize)> = doc_freq
            .iter()
            .filter(|(_, &df)| df >= config.min_df && (df as f64) <= max_doc_count)
            .map(|(term, _)| (term.clone(), term_freq[term]))
            .collect();

        if candidates.is_empty() {
            return Err(ScoringError::Training(
                "document frequency bounds pruned every term".to_string(),
            ));
        }

        // highest corpus frequency first, lexicographic on ties
        candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        candidates.truncate(config.max_features);

        let vocabulary: BTreeMap<String, usize> = {
            let mut terms: Vec<String> = candidates.into_iter().map(|(t, _)| t).collect();
            terms.sort();
            terms.into_iter().enumerate().map(|(i, t)| (t, i)).collect()
        };

        let mut idf = vec![0.0; vocabulary.len()];
        for (term, &idx) in &vocabulary {
            let df = doc_freq[term] as f64;
            idf[idx] = ((1.0 + n as f64) / (1.0 + df)).ln() + 1.0;
        }

        Ok(Self { vocabulary, idf, n_documents: n })
    }

    /// Vector over the fitted vocabulary; unknown terms contribute nothing
    pub fn transform(&self, text: &str) -> FeatureVector {
        let mut vector = vec![0.0; self.vocabulary.len()];
        for term in analyze(text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                vector[idx] += 1.0;
            }
        }
        for (value, idf) in vector.iter_mut().zip(&self.idf) {
            *value *= idf;
        }
        let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for value in vector.iter_mut() {
                *value /= norm;
            }
        }
        vector
    }

    pub fn transform_all(&self, documents: &[&str]) -> Vec<FeatureVector> {
        documents.iter().map(|doc| self.transform(doc)).collect()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    pub fn n_documents(&self) -> usize {
        self.n_documents
    }
}

/// Tokenize, drop stop words, emit unigrams followed by bigrams
fn analyze(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let tokens: Vec<&str> = TOKEN_PATTERN
        .find_iter(&lowered)
        .map(|m| m.as_str())
        .filter(|t| !STOP_WORDS.contains(t))
        .collect();

    let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
    terms.extend(tokens.windows(2).map(|w| format!("{} {}", w[0], w[1])));
    terms
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fit(docs: &[&str]) -> TfIdfVectorizer {
        TfIdfVectorizer::fit(docs, &TextConfig::default()).unwrap()
    }

    #[test]
    fn test_analyze_drops_stop_words_and_short_tokens() {
        let terms = analyze("Click HERE to verify a link");
        assert_eq!(terms, vec!["click", "verify", "link", "click verify", "verify link"]);
    }

    #[test]
    fn test_vocabulary_is_lexicographic() {
        let v = fit(&["zeta alpha", "alpha beta", "gamma"]);
        assert_eq!(v.vocabulary.get("alpha beta"), Some(&1));
        assert_eq!(v.vocabulary.get("alpha"), Some(&0));
    }

    #[test]
    fn test_max_df_prunes_ubiquitous_terms() {
        let v = fit(&["invoice paid", "invoice late", "invoice sent"]);
        assert!(!v.contains("invoice"));
        assert!(v.contains("paid"));
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let config = TextConfig { max_features: 1, ..TextConfig::default() };
        let v = TfIdfVectorizer::fit(&["urgent urgent verify", "meeting notes"], &config).unwrap();
        assert_eq!(v.vocabulary_size(), 1);
        assert!(v.contains("urgent"));
    }

    #[test]
    fn test_transform_is_unit_length() {
        let v = fit(&["verify account now", "team meeting today"]);
        let vec = v.transform("verify account");
        let norm: f64 = vec.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_out_of_vocabulary_is_zero() {
        let v = fit(&["verify account now", "team meeting today"]);
        let vec = v.transform("completely unseen words");
        assert!(vec.iter().all(|&x| x == 0.0));
        assert_eq!(vec.len(), v.vocabulary_size());
    }

    #[test]
    fn test_empty_corpus_fails() {
        assert!(TfIdfVectorizer::fit(&[], &TextConfig::default()).is_err());
    }
}
