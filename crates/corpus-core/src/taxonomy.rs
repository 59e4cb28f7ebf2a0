//! Concept synonym groups and display codes.
//!
//! Different filers report the same financial line item under different XBRL
//! tags. A [`ConceptSynonymGroup`] lists the interchangeable tags for one
//! canonical concept, and the [`Taxonomy`] holds the ordered groups together
//! with the table translating canonical keys into short column codes.

use std::collections::{BTreeMap, HashSet};

use crate::error::{CorpusError, Result};
use crate::period::Unit;
use crate::table::{DESCRIPTOR_COLUMNS, FISCAL_YEAR_COLUMN};

/// Ordered set of taxonomy tags representing one canonical concept.
///
/// The first tag is the canonical key: it names the output column and is
/// looked up in the display-code table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConceptSynonymGroup {
    tags: Vec<String>,
    unit: Unit,
}

impl ConceptSynonymGroup {
    /// Creates a group, validating that it has at least one tag and no blank or
    /// repeated tags.
    ///
    /// # Errors
    /// Returns [`CorpusError::Config`] when validation fails.
    pub fn new<I, S>(tags: I, unit: Unit) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let tags: Vec<String> = tags.into_iter().map(Into::into).collect();
        if tags.is_empty() {
            return Err(CorpusError::Config("Synonym group has no tags".to_string()));
        }
        let mut seen = HashSet::new();
        for tag in &tags {
            if tag.trim().is_empty() {
                return Err(CorpusError::Config(format!(
                    "Synonym group {:?} contains a blank tag",
                    tags[0]
                )));
            }
            if !seen.insert(tag.as_str()) {
                return Err(CorpusError::Config(format!(
                    "Synonym group {:?} lists {tag} twice",
                    tags[0]
                )));
            }
        }
        Ok(Self { tags, unit })
    }

    /// Creates a group reported in currency.
    ///
    /// # Errors
    /// See [`ConceptSynonymGroup::new`].
    pub fn currency<I, S>(tags: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(tags, Unit::Currency)
    }

    /// Canonical key of the concept.
    #[must_use]
    pub fn canonical(&self) -> &str {
        &self.tags[0]
    }

    /// All tags, canonical first.
    #[must_use]
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Unit the concept is read in.
    #[must_use]
    pub const fn unit(&self) -> Unit {
        self.unit
    }
}

/// Ordered concept groups plus the display-code table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Taxonomy {
    groups: Vec<ConceptSynonymGroup>,
    display_codes: BTreeMap<String, String>,
}

impl Taxonomy {
    /// Creates a taxonomy from groups and a canonical-key → code table.
    ///
    /// Groups sharing a canonical key are allowed (the assembler keeps the
    /// first), but two canonical keys may not end up with the same column name,
    /// whether translated or not.
    ///
    /// # Errors
    /// Returns [`CorpusError::Config`] for an empty group list, a blank code, a
    /// code used twice, or a column name that collides with another concept or
    /// with the fiscal-year and descriptor columns.
    pub fn new(
        groups: Vec<ConceptSynonymGroup>,
        display_codes: BTreeMap<String, String>,
    ) -> Result<Self> {
        if groups.is_empty() {
            return Err(CorpusError::Config("Taxonomy has no concepts".to_string()));
        }
        let mut codes = HashSet::new();
        for (key, code) in &display_codes {
            if code.trim().is_empty() {
                return Err(CorpusError::Config(format!("Blank display code for {key}")));
            }
            if !codes.insert(code.as_str()) {
                return Err(CorpusError::Config(format!(
                    "Display code {code} is used by more than one concept"
                )));
            }
        }

        let taxonomy = Self {
            groups,
            display_codes,
        };
        let mut canonicals = HashSet::new();
        let mut columns: HashSet<&str> = DESCRIPTOR_COLUMNS.into_iter().collect();
        columns.insert(FISCAL_YEAR_COLUMN);
        for group in &taxonomy.groups {
            if !canonicals.insert(group.canonical()) {
                continue;
            }
            let column = taxonomy.display_code(group.canonical());
            if !columns.insert(column) {
                return Err(CorpusError::Config(format!(
                    "Column {column} for {} collides with another column",
                    group.canonical()
                )));
            }
        }
        Ok(taxonomy)
    }

    /// The concept list used to build the training corpus.
    ///
    /// # Panics
    /// Never; the static table is covered by tests.
    #[must_use]
    pub fn standard() -> Self {
        let groups = STANDARD_GROUPS
            .iter()
            .map(|(unit, tags)| {
                ConceptSynonymGroup::new(tags.iter().copied(), *unit)
                    .expect("standard synonym groups are valid")
            })
            .collect();
        let codes = STANDARD_DISPLAY_CODES
            .iter()
            .map(|(key, code)| ((*key).to_string(), (*code).to_string()))
            .collect();
        Self::new(groups, codes).expect("standard taxonomy is valid")
    }

    /// Concept groups in output order.
    #[must_use]
    pub fn groups(&self) -> &[ConceptSynonymGroup] {
        &self.groups
    }

    /// Display code for a canonical key, or the key itself when untranslated.
    #[must_use]
    pub fn display_code<'a>(&'a self, canonical: &'a str) -> &'a str {
        self.display_codes
            .get(canonical)
            .map_or(canonical, String::as_str)
    }

    /// Returns the group whose canonical key matches.
    #[must_use]
    pub fn group(&self, canonical: &str) -> Option<&ConceptSynonymGroup> {
        self.groups.iter().find(|g| g.canonical() == canonical)
    }
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self::standard()
    }
}

const STANDARD_GROUPS: &[(Unit, &[&str])] = &[
    // Income statement
    (
        Unit::Currency,
        &[
            "Revenues",
            "SalesRevenueNet",
            "SalesRevenueServicesNet",
            "RevenuesNetOfInterestExpense",
            "RealEstateRevenueNet",
            "RevenueFromContractWithCustomerIncludingAssessedTax",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
            "SalesRevenueGoodsNet",
            "RevenuesExcludingInterestAndDividends",
            "RegulatedAndUnregulatedOperatingRevenue",
        ],
    ),
    (
        Unit::Currency,
        &[
            "CostOfRevenue",
            "CostOfGoodsAndServicesSold",
            "CostOfGoodsSold",
            "CostOfServices",
            "CostOfOtherPropertyOperatingExpense",
        ],
    ),
    (Unit::Currency, &["GrossProfit"]),
    (
        Unit::Currency,
        &[
            "ResearchAndDevelopmentExpense",
            "ResearchAndDevelopmentExpenseExcludingAcquiredInProcessCost",
        ],
    ),
    (
        Unit::Currency,
        &[
            "OperatingExpenses",
            "CostsAndExpenses",
            "OperatingCostsAndExpenses",
            "OperatingExpensesCogs",
            "BenefitsLossesAndExpenses",
        ],
    ),
    (Unit::Currency, &["OperatingIncomeLoss"]),
    (
        Unit::Currency,
        &[
            "InterestIncomeExpenseNonoperatingNet",
            "InterestExpenseOperating",
        ],
    ),
    (Unit::Currency, &["InterestExpense"]),
    (
        Unit::Currency,
        &["InvestmentIncomeInterest", "InterestIncomeOther"],
    ),
    (
        Unit::Currency,
        &[
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
            "IncomeLossFromContinuingOperationsBeforeIncomeTaxesMinorityInterestAndIncomeLossFromEquityMethodInvestments",
        ],
    ),
    (Unit::Currency, &["IncomeTaxExpenseBenefit"]),
    (
        Unit::Currency,
        &[
            "NetIncomeLoss",
            "NetIncomeLossAvailableToCommonStockholdersBasic",
            "ProfitLoss",
        ],
    ),
    (Unit::PerShare, &["EarningsPerShareDiluted"]),
    (
        Unit::ShareCount,
        &["WeightedAverageNumberOfDilutedSharesOutstanding"],
    ),
    // Balance sheet
    (Unit::Currency, &["CashAndCashEquivalentsAtCarryingValue"]),
    (Unit::Currency, &["InventoryNet"]),
    (Unit::Currency, &["AssetsCurrent", "InvestmentsAndCash"]),
    (
        Unit::Currency,
        &[
            "PropertyPlantAndEquipmentNet",
            "PropertyPlantAndEquipmentAndFinanceLeaseRightOfUseAssetAfterAccumulatedDepreciationAndAmortization",
        ],
    ),
    (Unit::Currency, &["Goodwill"]),
    (
        Unit::Currency,
        &[
            "IntangibleAssetsNetExcludingGoodwill",
            "FiniteLivedIntangibleAssetsNet",
        ],
    ),
    (Unit::Currency, &["Assets"]),
    (
        Unit::Currency,
        &["DebtCurrent", "LongTermDebtCurrent", "ShortTermBorrowings"],
    ),
    (Unit::Currency, &["LiabilitiesCurrent"]),
    (
        Unit::Currency,
        &[
            "LongTermDebtNoncurrent",
            "LongTermDebtAndCapitalLeaseObligations",
            "OtherLongTermDebtNoncurrent",
        ],
    ),
    (Unit::Currency, &["Liabilities"]),
    (Unit::Currency, &["RetainedEarningsAccumulatedDeficit"]),
    (
        Unit::Currency,
        &[
            "StockholdersEquity",
            "StockholdersEquityIncludingPortionAttributableToNoncontrollingInterest",
        ],
    ),
    // Cash flow
    (Unit::Currency, &["AmortizationOfIntangibleAssets"]),
    (Unit::Currency, &["Depreciation"]),
    (
        Unit::Currency,
        &[
            "DepreciationDepletionAndAmortization",
            "DepreciationAmortizationAndAccretionNet",
        ],
    ),
    (
        Unit::Currency,
        &[
            "NetCashProvidedByUsedInOperatingActivities",
            "NetCashProvidedByUsedInOperatingActivitiesContinuingOperations",
        ],
    ),
    (
        Unit::Currency,
        &[
            "PaymentsToAcquirePropertyPlantAndEquipment",
            "PaymentsToAcquireProductiveAssets",
            "PaymentsToAcquireOtherPropertyPlantAndEquipment",
            "PaymentsForCapitalImprovements",
        ],
    ),
    (
        Unit::Currency,
        &[
            "NetCashProvidedByUsedInInvestingActivities",
            "NetCashProvidedByUsedInInvestingActivitiesContinuingOperations",
        ],
    ),
    (
        Unit::Currency,
        &[
            "NetCashProvidedByUsedInFinancingActivities",
            "NetCashProvidedByUsedInFinancingActivitiesContinuingOperations",
        ],
    ),
];

const STANDARD_DISPLAY_CODES: &[(&str, &str)] = &[
    ("Revenues", "REVENUES"),
    ("CostOfRevenue", "COGS"),
    ("GrossProfit", "GROSSPROFIT"),
    ("ResearchAndDevelopmentExpense", "R&D"),
    ("OperatingExpenses", "OPEXPENSES"),
    ("OperatingIncomeLoss", "OPINCOME"),
    ("InterestIncomeExpenseNonoperatingNet", "INTERESTNET"),
    ("InterestExpense", "INTERESTEXP"),
    ("InvestmentIncomeInterest", "INTERESTINC"),
    (
        "IncomeLossFromContinuingOperationsBeforeIncomeTaxesExtraordinaryItemsNoncontrollingInterest",
        "NETINC",
    ),
    ("EarningsPerShareDiluted", "EPS"),
    ("WeightedAverageNumberOfDilutedSharesOutstanding", "SHARES"),
    ("CashAndCashEquivalentsAtCarryingValue", "CASH"),
    ("InventoryNet", "INVENTORY"),
    ("AssetsCurrent", "CASSETS"),
    ("PropertyPlantAndEquipmentNet", "PROPERTY"),
    ("Goodwill", "GOODWILL"),
    ("IntangibleAssetsNetExcludingGoodwill", "INTASSETS"),
    ("Assets", "ASSETS"),
    ("DebtCurrent", "STDEBT"),
    ("LiabilitiesCurrent", "CLIABILITIES"),
    ("LongTermDebtNoncurrent", "LTDEBT"),
    ("Liabilities", "LIABILITIES"),
    ("RetainedEarningsAccumulatedDeficit", "RETEARNINGS"),
    ("StockholdersEquity", "EQUITY"),
    ("AmortizationOfIntangibleAssets", "AMORTIZATION"),
    ("Depreciation", "DEPRECIATION"),
    ("DepreciationDepletionAndAmortization", "DEP&AMORT"),
    ("NetCashProvidedByUsedInOperatingActivities", "OPCF"),
    ("PaymentsToAcquirePropertyPlantAndEquipment", "CAPEX"),
    ("NetCashProvidedByUsedInInvestingActivities", "INCF"),
    ("NetCashProvidedByUsedInFinancingActivities", "FICF"),
];
