//! Synthetic training data
//!
//! The phishing corpus is a fixed, reviewable list. The login table is sampled from
//! two parameterized populations with a seeded RNG so every run with the same seed
//! yields the same bytes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, Normal, Poisson};
use serde::{Deserialize, Serialize};

use super::config::DatasetConfig;
use super::errors::{Result, ScoringError};
use super::features::{FeatureSchema, FeatureVector, LoginFeature};

/// Label for legitimate text
pub const LEGITIMATE: u8 = 0;
/// Label for phishing text
pub const PHISHING: u8 = 1;

/// Upper bound on the anomalous share of the login table
pub const MAX_ANOMALY_SHARE: f64 = 0.2;

const PHISHING_MESSAGES: &[&str] = &[
    "URGENT: Your account has been compromised. Click here to verify your identity immediately.",
    "Congratulations! You've won $1,000,000. Claim your prize now by clicking this link.",
    "Your bank account will be suspended unless you update your information within 24 hours.",
    "Dear customer, we detected unusual activity. Please verify your credentials at this link.",
    "You have an unclaimed tax refund of $3,247. Click here to claim it now.",
    "Your PayPal account has been limited. Restore access by confirming your details.",
    "ALERT: Someone tried to access your account from Russia. Secure it now.",
    "Free iPhone 15! You've been selected. Click to claim your reward.",
    "Your Netflix subscription has expired. Update payment to avoid losing access.",
    "We noticed suspicious login from unknown device. Verify your identity now.",
    "IMPORTANT: Your social security number has been compromised. Call immediately.",
    "Exclusive offer: Get 90% discount on luxury watches. Limited time only!",
    "Your Apple ID was used to sign in on a new device. If this wasn't you, click here.",
    "WARNING: Your computer is infected with 5 viruses. Download antivirus now.",
    "Dear user, your email storage is full. Upgrade now or lose your emails.",
    "You've received a secure document from IRS. Click to view your tax return.",
    "FINAL WARNING: Your domain will expire in 24 hours. Renew immediately.",
    "Lucky winner! You are selected for a $500 Walmart gift card. Claim now.",
    "Unauthorized transaction detected on your Visa card. Verify now to cancel.",
    "Your Microsoft account password expires today. Click here to reset.",
    "Dear taxpayer, you have a pending refund. Submit your bank details to receive it.",
    "SECURITY ALERT: Multiple failed login attempts detected. Secure your account.",
    "You've been selected for a government grant of $25,000. Apply now.",
    "Your Amazon order #8372 cannot be delivered. Update shipping address now.",
    "CRITICAL: Your router has been hacked. Download security patch immediately.",
    "Verify your email to continue using your account. Click the link below.",
    "You have 1 new voice message from IRS. Click to listen.",
    "Your Google Drive storage is 95% full. Upgrade to premium storage now.",
    "Package delivery failed. Click here to reschedule your UPS delivery.",
    "Alert: Your credit score dropped 150 points. Check your report now.",
    "Exclusive invitation to earn $5000/week working from home. Sign up today.",
    "Your antivirus license expired. Renew now for continued protection.",
    "We've detected malware on your device. Run an immediate scan.",
    "Your loan application has been pre-approved for $50,000. Claim now.",
    "URGENT: Wire transfer of $10,000 pending your approval. Confirm now.",
    "Your Dropbox account was accessed from Nigeria. Secure it immediately.",
    "Congratulations on your retirement benefit increase. Verify details now.",
    "Your Wi-Fi network is at risk. Update firmware immediately.",
    "You have a pending court notice. Download the document here.",
    "Flash sale: Premium software bundle worth $2000 for only $29. Buy now.",
];

const LEGITIMATE_MESSAGES: &[&str] = &[
    "Hi team, please review the quarterly report attached and share feedback by Friday.",
    "Meeting reminder: Project standup at 10 AM tomorrow in conference room B.",
    "Your order #4521 has been shipped and will arrive by Thursday.",
    "Please find the updated project timeline in the shared drive.",
    "Thank you for your payment. Your invoice #789 has been processed.",
    "The deployment to staging environment has been completed successfully.",
    "Reminder: Team building event next Friday at 3 PM in the main hall.",
    "Your pull request #234 has been approved and merged to main branch.",
    "Monthly newsletter: Check out our latest blog posts and product updates.",
    "Your subscription renewal has been processed. Next billing date: March 15.",
    "Hi, can we schedule a call to discuss the API integration requirements?",
    "Build #1847 passed all tests. Ready for production deployment.",
    "Updated the documentation for the new authentication endpoints.",
    "Please complete your annual security training by end of this month.",
    "The database migration has been completed. All services are operational.",
    "Weekly status report: Sprint velocity improved by 15% this iteration.",
    "Your leave request for Dec 25-27 has been approved by your manager.",
    "Reminder: Code freeze starts tomorrow at 5 PM for the release.",
    "The new feature flag for dark mode has been enabled in production.",
    "Team lunch today at 12:30 PM. Please RSVP by 11 AM.",
    "Your performance review meeting is scheduled for next Tuesday at 2 PM.",
    "Infrastructure maintenance window: Saturday 2-4 AM UTC.",
    "New hire orientation schedule has been updated. Please review.",
    "The load testing results show 99.9% uptime under peak conditions.",
    "Please update your profile information in the HR portal.",
    "Quarterly revenue report is ready for board review.",
    "The CI/CD pipeline has been optimized, reducing build time by 40%.",
    "Your expense report for November has been approved and reimbursed.",
    "System monitoring shows all services healthy. No incidents reported.",
    "The new version of our API documentation is live. Check it out.",
    "Reminder: Submit your timesheet for this pay period by end of day.",
    "The accessibility audit found 3 minor issues. Fix list attached.",
    "Database backup completed successfully. All data verified.",
    "Your conference registration for TechSummit 2024 has been confirmed.",
    "Sprint retrospective notes have been posted to the team wiki.",
    "New security patches have been applied to all production servers.",
    "Your GitHub access has been provisioned for the new repository.",
    "The design review for the dashboard redesign is Tuesday at 11 AM.",
    "Server certificates have been renewed. Valid through December 2025.",
    "Weekly digest: 15 PRs merged, 3 issues resolved, 2 new features shipped.",
];

/// A labeled text sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabeledText {
    pub text: String,
    /// `PHISHING` or `LEGITIMATE`
    pub label: u8,
}

/// Ordered phishing/legitimate examples
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhishingCorpus {
    samples: Vec<LabeledText>,
}

impl PhishingCorpus {
    /// Wrap caller-provided samples. Labels must be 0 or 1.
    pub fn from_samples(samples: Vec<LabeledText>) -> Result<Self> {
        if samples.is_empty() {
            return Err(ScoringError::InvalidInput("corpus is empty".to_string()));
        }
        if let Some(bad) = samples.iter().find(|s| s.label > PHISHING) {
            return Err(ScoringError::InvalidInput(format!("label {} is not binary", bad.label)));
        }
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[LabeledText] {
        &self.samples
    }

    pub fn texts(&self) -> Vec<&str> {
        self.samples.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn labels(&self) -> Vec<u8> {
        self.samples.iter().map(|s| s.label).collect()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Login rows in schema column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginTable {
    pub schema: FeatureSchema,
    pub rows: Vec<FeatureVector>,
    /// Which rows came from the anomalous population. Evaluation only.
    pub ground_truth: Vec<bool>,
}

impl LoginTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values of one named column
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.schema.position(name)?;
        Some(self.rows.iter().map(|row| row[idx]).collect())
    }

    pub fn anomaly_count(&self) -> usize {
        self.ground_truth.iter().filter(|&&a| a).count()
    }
}

/// Hand-curated phishing corpus: phishing messages first, then legitimate ones
pub fn phishing_corpus() -> PhishingCorpus {
    let samples = PHISHING_MESSAGES
        .iter()
        .map(|text| LabeledText { text: text.to_string(), label: PHISHING })
        .chain(
            LEGITIMATE_MESSAGES
                .iter()
                .map(|text| LabeledText { text: text.to_string(), label: LEGITIMATE }),
        )
        .collect();
    PhishingCorpus { samples }
}

/// Seeded login table: normal population followed by the anomalous one
pub fn login_table(config: &DatasetConfig) -> Result<LoginTable> {
    let normal = config.normal_samples;
    let anomalous = config.anomaly_samples;
    let total = normal + anomalous;
    if normal == 0 {
        return Err(ScoringError::InvalidInput("normal population is empty".to_string()));
    }
    if anomalous as f64 > MAX_ANOMALY_SHARE * total as f64 {
        return Err(ScoringError::InvalidInput(format!(
            "anomalous share {:.2} exceeds {:.2}",
            anomalous as f64 / total as f64,
            MAX_ANOMALY_SHARE
        )));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    let normal_columns = [
        clipped(&mut rng, &normal_dist(10.0, 3.0)?, normal, 0.0, 23.0),
        clipped(&mut rng, &normal_dist(50.0, 15.0)?, normal, 1.0, 100.0),
        (0..normal)
            .map(|_| [0.0, 0.0, 0.0, 0.0, 1.0][rng.gen_range(0..5)])
            .collect(),
        clipped(&mut rng, &poisson_dist(0.5)?, normal, 0.0, 3.0),
        clipped(&mut rng, &normal_dist(30.0, 10.0)?, normal, 1.0, 120.0),
    ];

    let anomalous_columns = [
        uniform(&mut rng, anomalous, 0.0, 5.0),
        uniform(&mut rng, anomalous, 1.0, 5.0),
        vec![1.0; anomalous],
        clipped(&mut rng, &poisson_dist(5.0)?, anomalous, 3.0, 20.0),
        uniform(&mut rng, anomalous, 1.0, 5.0),
    ];

    let schema = FeatureSchema::login();
    debug_assert_eq!(schema.len(), LoginFeature::ALL.len());

    let mut rows = Vec::with_capacity(total);
    rows.extend(transpose(&normal_columns, normal));
    rows.extend(transpose(&anomalous_columns, anomalous));

    let mut ground_truth = vec![false; normal];
    ground_truth.extend(std::iter::repeat(true).take(anomalous));

    Ok(LoginTable { schema, rows, ground_truth })
}

fn normal_dist(mean: f64, std_dev: f64) -> Result<Normal<f64>> {
    Normal::new(mean, std_dev).map_err(|e| ScoringError::InvalidInput(format!("normal({}, {}): {}", mean, std_dev, e)))
}

fn poisson_dist(lambda: f64) -> Result<Poisson<f64>> {
    Poisson::new(lambda).map_err(|e| ScoringError::InvalidInput(format!("poisson({}): {}", lambda, e)))
}

fn clipped<D: Distribution<f64>>(rng: &mut StdRng, dist: &D, n: usize, lo: f64, hi: f64) -> Vec<f64> {
    (0..n).map(|_| dist.sample(rng).clamp(lo, hi)).collect()
}

fn uniform(rng: &mut StdRng, n: usize, lo: f64, hi: f64) -> Vec<f64> {
    (0..n).map(|_| rng.gen_range(lo..hi)).collect()
}

fn transpose(columns: &[Vec<f64>], n: usize) -> Vec<FeatureVector> {
    (0..n).map(|i| columns.iter().map(|col| col[i]).collect()).collect()
}
