//! Built-in pricing descriptors.
//!
//! Rates are monthly list prices in USD for the reference region, assuming
//! 730 hours per month.

use skyplan_core::diagram::ServiceType;

use super::descriptor::{Descriptor, Field, LineItem, Resolved, SelectOption, SkuRule};

const HOURS_PER_MONTH: f64 = 730.0;

/// Every registered descriptor.
pub static DESCRIPTORS: &[&Descriptor] = &[
    &APP_SERVICE,
    &FUNCTION_APP,
    &VIRTUAL_MACHINE,
    &KUBERNETES_SERVICE,
    &SQL_DATABASE,
    &COSMOS_DB,
    &STORAGE_ACCOUNT,
    &REDIS_CACHE,
    &KEY_VAULT,
    &APPLICATION_GATEWAY,
    &API_MANAGEMENT,
    &SERVICE_BUS,
    &APPLICATION_INSIGHTS,
    &LOG_ANALYTICS,
    &OPEN_AI,
];

/// Returns the descriptor of a service type, if one is registered.
pub fn descriptor(service: ServiceType) -> Option<&'static Descriptor> {
    DESCRIPTORS
        .iter()
        .copied()
        .find(|descriptor| descriptor.service() == service)
}

// App Service

const APP_SERVICE_TIERS: &[SelectOption] = &[
    SelectOption::new("f1", "Free F1"),
    SelectOption::new("b1", "Basic B1"),
    SelectOption::new("b2", "Basic B2"),
    SelectOption::new("s1", "Standard S1"),
    SelectOption::new("s2", "Standard S2"),
    SelectOption::new("p1v3", "Premium P1v3"),
    SelectOption::new("p2v3", "Premium P2v3"),
];

const APP_SERVICE_FIELDS: &[Field] = &[
    Field::select("tier", "Pricing tier", APP_SERVICE_TIERS, "b1"),
    Field::number("instances", "Instances", 1.0, 30.0, 1.0, 1.0),
    Field::toggle("zoneRedundant", "Zone redundant", false)
        .visible_when("tier", &["p1v3", "p2v3"]),
];

static APP_SERVICE: Descriptor = Descriptor::new(
    ServiceType::AppService,
    APP_SERVICE_FIELDS,
    SkuRule::new("tier").with_count("instances"),
    app_service,
);

fn app_service(config: &Resolved<'_>) -> Vec<LineItem> {
    let rate = match config.choice("tier") {
        "f1" => 0.0,
        "b2" => 109.5,
        "s1" => 73.0,
        "s2" => 146.0,
        "p1v3" => 240.9,
        "p2v3" => 481.8,
        _ => 54.75,
    };
    let mut instances = config.number("instances");
    // Zone redundancy needs an instance in each of three zones.
    if config.toggle("zoneRedundant") {
        instances = instances.max(3.0);
    }
    let label = config.choice_label("tier").unwrap_or_default();

    vec![LineItem::new(
        format!("App Service plan {label} x{instances}"),
        rate * instances,
    )]
}

// Function App

const FUNCTION_PLANS: &[SelectOption] = &[
    SelectOption::new("consumption", "Consumption"),
    SelectOption::new("ep1", "Premium EP1"),
    SelectOption::new("ep2", "Premium EP2"),
];

const FUNCTION_APP_FIELDS: &[Field] = &[
    Field::select("plan", "Hosting plan", FUNCTION_PLANS, "consumption"),
    Field::number("executions", "Executions (millions)", 0.0, 10_000.0, 1.0, 1.0)
        .visible_when("plan", &["consumption"]),
    Field::number("gbSeconds", "Execution time (thousand GB-s)", 0.0, 100_000.0, 10.0, 400.0)
        .visible_when("plan", &["consumption"]),
    Field::number("instances", "Instances", 1.0, 20.0, 1.0, 1.0)
        .visible_when("plan", &["ep1", "ep2"]),
];

static FUNCTION_APP: Descriptor = Descriptor::new(
    ServiceType::FunctionApp,
    FUNCTION_APP_FIELDS,
    SkuRule::new("plan").with_count("instances"),
    function_app,
);

fn function_app(config: &Resolved<'_>) -> Vec<LineItem> {
    match config.choice("plan") {
        "consumption" => {
            // One million executions and 400,000 GB-s are free each month.
            let executions = (config.number("executions") - 1.0).max(0.0);
            let gb_seconds = (config.number("gbSeconds") * 1000.0 - 400_000.0).max(0.0);
            vec![
                LineItem::new("Executions", executions * 0.2),
                LineItem::new("Execution time", gb_seconds * 0.000016),
            ]
        }
        plan => {
            let rate = if plan == "ep2" { 310.98 } else { 155.49 };
            let instances = config.number("instances");
            let label = config.choice_label("plan").unwrap_or_default();
            vec![LineItem::new(
                format!("{label} plan x{instances}"),
                rate * instances,
            )]
        }
    }
}

// Virtual Machine

const VM_SIZES: &[SelectOption] = &[
    SelectOption::new("b2s", "B2s"),
    SelectOption::new("d2s-v5", "D2s v5"),
    SelectOption::new("d4s-v5", "D4s v5"),
    SelectOption::new("e4s-v5", "E4s v5"),
];

const OPERATING_SYSTEMS: &[SelectOption] = &[
    SelectOption::new("linux", "Linux"),
    SelectOption::new("windows", "Windows"),
];

const VIRTUAL_MACHINE_FIELDS: &[Field] = &[
    Field::select("size", "Size", VM_SIZES, "d2s-v5"),
    Field::select("os", "Operating system", OPERATING_SYSTEMS, "linux"),
    Field::number("count", "Instances", 1.0, 100.0, 1.0, 1.0),
    Field::number("diskGb", "OS disk (GB)", 32.0, 4096.0, 32.0, 128.0),
];

static VIRTUAL_MACHINE: Descriptor = Descriptor::new(
    ServiceType::VirtualMachine,
    VIRTUAL_MACHINE_FIELDS,
    SkuRule::new("size").with_count("count"),
    virtual_machine,
);

fn virtual_machine(config: &Resolved<'_>) -> Vec<LineItem> {
    let (compute, license) = match config.choice("size") {
        "b2s" => (30.37, 14.6),
        "d4s-v5" => (140.16, 134.32),
        "e4s-v5" => (183.96, 134.32),
        _ => (70.08, 67.16),
    };
    let count = config.number("count");
    let label = config.choice_label("size").unwrap_or_default();

    let mut items = vec![LineItem::new(
        format!("Compute {label} x{count}"),
        compute * count,
    )];
    if config.choice("os") == "windows" {
        items.push(LineItem::new("Windows license", license * count));
    }
    items.push(LineItem::new(
        "Managed disks",
        config.number("diskGb") * 0.154 * count,
    ));
    items
}

// Kubernetes Service

const AKS_TIERS: &[SelectOption] = &[
    SelectOption::new("free", "Free"),
    SelectOption::new("standard", "Standard"),
];

const AKS_NODE_SIZES: &[SelectOption] = &[
    SelectOption::new("d2s-v5", "D2s v5"),
    SelectOption::new("d4s-v5", "D4s v5"),
    SelectOption::new("d8s-v5", "D8s v5"),
];

const KUBERNETES_SERVICE_FIELDS: &[Field] = &[
    Field::select("tier", "Cluster tier", AKS_TIERS, "free"),
    Field::select("nodeSize", "Node size", AKS_NODE_SIZES, "d4s-v5"),
    Field::number("nodeCount", "Nodes", 1.0, 100.0, 1.0, 3.0),
];

static KUBERNETES_SERVICE: Descriptor = Descriptor::new(
    ServiceType::KubernetesService,
    KUBERNETES_SERVICE_FIELDS,
    SkuRule::new("nodeSize").with_count("nodeCount"),
    kubernetes_service,
);

fn kubernetes_service(config: &Resolved<'_>) -> Vec<LineItem> {
    let management = if config.choice("tier") == "standard" {
        0.1 * HOURS_PER_MONTH
    } else {
        0.0
    };
    let node_rate = match config.choice("nodeSize") {
        "d2s-v5" => 70.08,
        "d8s-v5" => 280.32,
        _ => 140.16,
    };
    let nodes = config.number("nodeCount");
    let label = config.choice_label("nodeSize").unwrap_or_default();

    vec![
        LineItem::new("Cluster management", management),
        LineItem::new(format!("Node pool {label} x{nodes}"), node_rate * nodes),
    ]
}

// SQL Database

const SQL_TIERS: &[SelectOption] = &[
    SelectOption::new("basic", "Basic"),
    SelectOption::new("s0", "Standard S0"),
    SelectOption::new("s1", "Standard S1"),
    SelectOption::new("s3", "Standard S3"),
    SelectOption::new("p1", "Premium P1"),
    SelectOption::new("p2", "Premium P2"),
];

const SQL_DATABASE_FIELDS: &[Field] = &[
    Field::select("tier", "Service tier", SQL_TIERS, "s0"),
    Field::number("storageGb", "Storage (GB)", 1.0, 4096.0, 1.0, 32.0),
    Field::toggle("geoReplica", "Geo-replica", false),
];

static SQL_DATABASE: Descriptor = Descriptor::new(
    ServiceType::SqlDatabase,
    SQL_DATABASE_FIELDS,
    SkuRule::new("tier"),
    sql_database,
);

fn sql_database(config: &Resolved<'_>) -> Vec<LineItem> {
    // (monthly rate, included storage in GB)
    let (rate, included) = match config.choice("tier") {
        "basic" => (4.9, 2.0),
        "s1" => (29.43, 250.0),
        "s3" => (147.17, 250.0),
        "p1" => (456.25, 500.0),
        "p2" => (912.5, 500.0),
        _ => (14.72, 250.0),
    };
    let label = config.choice_label("tier").unwrap_or_default();
    let extra_storage = (config.number("storageGb") - included).max(0.0);

    let mut items = vec![
        LineItem::new(format!("Database {label}"), rate),
        LineItem::new("Extra storage", extra_storage * 0.17),
    ];
    if config.toggle("geoReplica") {
        items.push(LineItem::new("Geo-replica", rate));
    }
    items
}

// Cosmos DB

const COSMOS_MODES: &[SelectOption] = &[
    SelectOption::new("provisioned", "Provisioned throughput"),
    SelectOption::new("serverless", "Serverless"),
];

const COSMOS_DB_FIELDS: &[Field] = &[
    Field::select("capacityMode", "Capacity mode", COSMOS_MODES, "provisioned"),
    Field::number("throughput", "Throughput (RU/s)", 400.0, 100_000.0, 100.0, 400.0)
        .visible_when("capacityMode", &["provisioned"]),
    Field::number("regions", "Regions", 1.0, 10.0, 1.0, 1.0)
        .visible_when("capacityMode", &["provisioned"]),
    Field::number("requestUnits", "Request units (millions)", 0.0, 100_000.0, 1.0, 10.0)
        .visible_when("capacityMode", &["serverless"]),
    Field::number("storageGb", "Storage (GB)", 1.0, 10_000.0, 1.0, 25.0),
];

static COSMOS_DB: Descriptor = Descriptor::new(
    ServiceType::CosmosDb,
    COSMOS_DB_FIELDS,
    SkuRule::new("capacityMode"),
    cosmos_db,
);

fn cosmos_db(config: &Resolved<'_>) -> Vec<LineItem> {
    let regions = config.number("regions");
    let storage = config.number("storageGb") * 0.25 * regions;

    match config.choice("capacityMode") {
        "serverless" => vec![
            LineItem::new("Request units", config.number("requestUnits") * 0.25),
            LineItem::new("Storage", storage),
        ],
        _ => vec![
            LineItem::new(
                "Provisioned throughput",
                config.number("throughput") / 100.0 * 0.008 * HOURS_PER_MONTH * regions,
            ),
            LineItem::new("Storage", storage),
        ],
    }
}

// Storage Account

const REDUNDANCY: &[SelectOption] = &[
    SelectOption::new("lrs", "Standard LRS"),
    SelectOption::new("zrs", "Standard ZRS"),
    SelectOption::new("grs", "Standard GRS"),
    SelectOption::new("ra-grs", "Standard RA-GRS"),
];

const ACCESS_TIERS: &[SelectOption] = &[
    SelectOption::new("hot", "Hot"),
    SelectOption::new("cool", "Cool"),
];

const STORAGE_ACCOUNT_FIELDS: &[Field] = &[
    Field::select("redundancy", "Redundancy", REDUNDANCY, "lrs"),
    Field::select("accessTier", "Access tier", ACCESS_TIERS, "hot"),
    Field::number("capacityGb", "Capacity (GB)", 0.0, 500_000.0, 1.0, 100.0),
    Field::number("transactions", "Transactions (10k)", 0.0, 1_000_000.0, 1.0, 10.0),
];

static STORAGE_ACCOUNT: Descriptor = Descriptor::new(
    ServiceType::StorageAccount,
    STORAGE_ACCOUNT_FIELDS,
    SkuRule::new("redundancy"),
    storage_account,
);

fn storage_account(config: &Resolved<'_>) -> Vec<LineItem> {
    let per_gb = match config.choice("redundancy") {
        "zrs" => 0.026,
        "grs" => 0.0458,
        "ra-grs" => 0.0572,
        _ => 0.0208,
    };
    let (capacity_factor, transaction_rate) = match config.choice("accessTier") {
        "cool" => (0.5, 0.01),
        _ => (1.0, 0.0044),
    };

    vec![
        LineItem::new(
            "Capacity",
            config.number("capacityGb") * per_gb * capacity_factor,
        ),
        LineItem::new(
            "Transactions",
            config.number("transactions") * transaction_rate,
        ),
    ]
}

// Redis Cache

const REDIS_TIERS: &[SelectOption] = &[
    SelectOption::new("basic-c0", "Basic C0"),
    SelectOption::new("basic-c1", "Basic C1"),
    SelectOption::new("standard-c0", "Standard C0"),
    SelectOption::new("standard-c1", "Standard C1"),
    SelectOption::new("standard-c2", "Standard C2"),
    SelectOption::new("premium-p1", "Premium P1"),
    SelectOption::new("premium-p2", "Premium P2"),
];

const REDIS_CACHE_FIELDS: &[Field] = &[
    Field::select("tier", "Cache tier", REDIS_TIERS, "standard-c1"),
    Field::number("shards", "Shards", 1.0, 10.0, 1.0, 1.0)
        .visible_when("tier", &["premium-p1", "premium-p2"]),
];

static REDIS_CACHE: Descriptor = Descriptor::new(
    ServiceType::RedisCache,
    REDIS_CACHE_FIELDS,
    SkuRule::new("tier").with_count("shards"),
    redis_cache,
);

fn redis_cache(config: &Resolved<'_>) -> Vec<LineItem> {
    let rate = match config.choice("tier") {
        "basic-c0" => 16.06,
        "basic-c1" | "standard-c0" => 40.15,
        "standard-c2" => 164.98,
        "premium-p1" => 411.72,
        "premium-p2" => 823.44,
        _ => 101.47,
    };
    // Hidden outside the premium tiers, where it resolves to one.
    let shards = config.number("shards");
    let label = config.choice_label("tier").unwrap_or_default();

    vec![LineItem::new(format!("Cache {label}"), rate * shards)]
}

// Key Vault

const KEY_VAULT_SKUS: &[SelectOption] = &[
    SelectOption::new("standard", "Standard"),
    SelectOption::new("premium", "Premium"),
];

const KEY_VAULT_FIELDS: &[Field] = &[
    Field::select("sku", "SKU", KEY_VAULT_SKUS, "standard"),
    Field::number("operations", "Operations (10k)", 0.0, 1_000_000.0, 1.0, 10.0),
    Field::number("hsmKeys", "HSM-protected keys", 0.0, 1000.0, 1.0, 0.0)
        .visible_when("sku", &["premium"]),
];

static KEY_VAULT: Descriptor = Descriptor::new(
    ServiceType::KeyVault,
    KEY_VAULT_FIELDS,
    SkuRule::new("sku"),
    key_vault,
);

fn key_vault(config: &Resolved<'_>) -> Vec<LineItem> {
    let mut items = vec![LineItem::new(
        "Operations",
        config.number("operations") * 0.03,
    )];
    if config.choice("sku") == "premium" {
        items.push(LineItem::new("HSM-protected keys", config.number("hsmKeys")));
    }
    items
}

// Application Gateway

const GATEWAY_SKUS: &[SelectOption] = &[
    SelectOption::new("standard-v2", "Standard v2"),
    SelectOption::new("waf-v2", "WAF v2"),
];

const APPLICATION_GATEWAY_FIELDS: &[Field] = &[
    Field::select("sku", "SKU", GATEWAY_SKUS, "standard-v2"),
    Field::number("capacityUnits", "Capacity units", 0.0, 125.0, 1.0, 2.0),
];

static APPLICATION_GATEWAY: Descriptor = Descriptor::new(
    ServiceType::ApplicationGateway,
    APPLICATION_GATEWAY_FIELDS,
    SkuRule::new("sku"),
    application_gateway,
);

fn application_gateway(config: &Resolved<'_>) -> Vec<LineItem> {
    let (fixed, per_unit) = match config.choice("sku") {
        "waf-v2" => (323.39, 10.51),
        _ => (179.58, 5.84),
    };
    let label = config.choice_label("sku").unwrap_or_default();

    vec![
        LineItem::new(format!("Gateway {label}"), fixed),
        LineItem::new("Capacity units", config.number("capacityUnits") * per_unit),
    ]
}

// API Management

const APIM_TIERS: &[SelectOption] = &[
    SelectOption::new("consumption", "Consumption"),
    SelectOption::new("developer", "Developer"),
    SelectOption::new("basic", "Basic"),
    SelectOption::new("standard", "Standard"),
    SelectOption::new("premium", "Premium"),
];

const API_MANAGEMENT_FIELDS: &[Field] = &[
    Field::select("tier", "Tier", APIM_TIERS, "developer"),
    Field::number("units", "Units", 1.0, 10.0, 1.0, 1.0)
        .visible_when("tier", &["basic", "standard", "premium"]),
    Field::number("calls", "Calls (millions)", 0.0, 10_000.0, 1.0, 1.0)
        .visible_when("tier", &["consumption"]),
];

static API_MANAGEMENT: Descriptor = Descriptor::new(
    ServiceType::ApiManagement,
    API_MANAGEMENT_FIELDS,
    SkuRule::new("tier").with_count("units"),
    api_management,
);

fn api_management(config: &Resolved<'_>) -> Vec<LineItem> {
    let rate = match config.choice("tier") {
        "consumption" => {
            // The first million calls are free.
            let calls = (config.number("calls") - 1.0).max(0.0);
            return vec![LineItem::new("Calls", calls * 3.5)];
        }
        "basic" => 147.17,
        "standard" => 686.72,
        "premium" => 2795.17,
        _ => 48.04,
    };
    let units = config.number("units");
    let label = config.choice_label("tier").unwrap_or_default();

    vec![LineItem::new(format!("{label} units x{units}"), rate * units)]
}

// Service Bus

const SERVICE_BUS_TIERS: &[SelectOption] = &[
    SelectOption::new("basic", "Basic"),
    SelectOption::new("standard", "Standard"),
    SelectOption::new("premium", "Premium"),
];

const SERVICE_BUS_FIELDS: &[Field] = &[
    Field::select("tier", "Tier", SERVICE_BUS_TIERS, "standard"),
    Field::number("operations", "Operations (millions)", 0.0, 100_000.0, 1.0, 10.0)
        .visible_when("tier", &["basic", "standard"]),
    Field::number("messagingUnits", "Messaging units", 1.0, 16.0, 1.0, 1.0)
        .visible_when("tier", &["premium"]),
];

static SERVICE_BUS: Descriptor = Descriptor::new(
    ServiceType::ServiceBus,
    SERVICE_BUS_FIELDS,
    SkuRule::new("tier").with_count("messagingUnits"),
    service_bus,
);

fn service_bus(config: &Resolved<'_>) -> Vec<LineItem> {
    let operations = config.number("operations");
    match config.choice("tier") {
        "basic" => vec![LineItem::new("Operations", operations * 0.05)],
        "premium" => vec![LineItem::new(
            "Messaging units",
            config.number("messagingUnits") * 677.08,
        )],
        _ => vec![
            LineItem::new("Base charge", 10.0),
            // 13 million operations are included in the base charge.
            LineItem::new("Operations", (operations - 13.0).max(0.0) * 0.8),
        ],
    }
}

// Monitoring

const MONITORING_FIELDS: &[Field] = &[
    Field::number("ingestionGbPerDay", "Ingestion (GB/day)", 0.0, 1000.0, 0.1, 1.0),
    Field::number("retentionDays", "Retention (days)", 30.0, 730.0, 1.0, 90.0),
];

static APPLICATION_INSIGHTS: Descriptor = Descriptor::new(
    ServiceType::ApplicationInsights,
    MONITORING_FIELDS,
    SkuRule::fixed("Pay-as-you-go"),
    application_insights,
);

static LOG_ANALYTICS: Descriptor = Descriptor::new(
    ServiceType::LogAnalytics,
    MONITORING_FIELDS,
    SkuRule::fixed("Pay-as-you-go"),
    log_analytics,
);

fn application_insights(config: &Resolved<'_>) -> Vec<LineItem> {
    monitoring_items(config, 90.0)
}

fn log_analytics(config: &Resolved<'_>) -> Vec<LineItem> {
    monitoring_items(config, 31.0)
}

/// Ingestion beyond the 5 GB monthly allowance, plus retention beyond the
/// free period.
fn monitoring_items(config: &Resolved<'_>, free_retention_days: f64) -> Vec<LineItem> {
    let monthly_gb = config.number("ingestionGbPerDay") * 30.0;
    let billable_gb = (monthly_gb - 5.0).max(0.0);
    let extra_days = (config.number("retentionDays") - free_retention_days).max(0.0);

    vec![
        LineItem::new("Data ingestion", billable_gb * 2.3),
        LineItem::new("Data retention", monthly_gb * 0.1 * extra_days / 30.0),
    ]
}

// Azure OpenAI

const OPENAI_MODELS: &[SelectOption] = &[
    SelectOption::new("gpt-4o", "GPT-4o"),
    SelectOption::new("gpt-4o-mini", "GPT-4o mini"),
    SelectOption::new("gpt-4.1", "GPT-4.1"),
];

const OPEN_AI_FIELDS: &[Field] = &[
    Field::select("model", "Model", OPENAI_MODELS, "gpt-4o-mini"),
    Field::number("inputTokens", "Input tokens (millions)", 0.0, 100_000.0, 1.0, 10.0),
    Field::number("outputTokens", "Output tokens (millions)", 0.0, 100_000.0, 1.0, 2.0),
];

static OPEN_AI: Descriptor = Descriptor::new(
    ServiceType::OpenAi,
    OPEN_AI_FIELDS,
    SkuRule::new("model"),
    open_ai,
);

fn open_ai(config: &Resolved<'_>) -> Vec<LineItem> {
    let (input, output) = match config.choice("model") {
        "gpt-4o" => (2.5, 10.0),
        "gpt-4.1" => (2.0, 8.0),
        _ => (0.15, 0.6),
    };

    vec![
        LineItem::new("Input tokens", config.number("inputTokens") * input),
        LineItem::new("Output tokens", config.number("outputTokens") * output),
    ]
}
