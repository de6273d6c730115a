//! Per-service AWS billing tables: usage multipliers, valid regions,
//! usage-type vocabularies, resource-id formats, and (service, usage-type)
//! rates. Multiplier tiers follow public spend-breakdown benchmarks.

use rand::{Rng, RngCore};

/// Rate applied to (service, usage-type) pairs without a table entry.
pub const DEFAULT_RATE: f64 = 0.01;

/// Services with known region mappings; the uniform draw set for generated
/// `service` fields in the cloud-billing profile.
pub const SERVICES: &[&str] = &[
    "EC2",
    "S3",
    "Lambda",
    "RDS",
    "DynamoDB",
    "Redshift",
    "CloudFront",
    "EKS",
    "ECS",
    "Aurora",
    "ElastiCache",
    "SageMaker",
    "Glue",
    "Athena",
    "Kinesis",
    "WAF",
    "GuardDuty",
    "Macie",
    "StepFunctions",
    "SNS",
    "SQS",
    "CloudWatch",
    "Bedrock",
    "EMR",
    "FSx",
    "Backup",
    "AppSync",
    "QuickSight",
    "DirectConnect",
    "TransitGateway",
    "VPC",
    "IAM",
    "CostExplorer",
];

/// Relative usage multiplier applied to `usage_quantity` per service.
pub fn usage_multiplier(service: &str) -> Option<f64> {
    let multiplier = match service {
        "EC2" => 100.0,
        "S3" => 60.0,
        "RDS" => 40.0,
        "Lambda" => 20.0,
        "Redshift" => 18.0,
        "Aurora" => 15.0,
        "DynamoDB" => 12.0,
        "FSx" => 10.0,
        "EMR" => 10.0,
        "ECS" => 8.0,
        "EKS" => 8.0,
        "CloudFront" => 6.0,
        "ElastiCache" => 5.0,
        "SageMaker" => 5.0,
        "Glue" => 4.0,
        "Athena" => 4.0,
        "Bedrock" => 2.0,
        "Backup" => 2.0,
        "StepFunctions" => 1.5,
        "SNS" => 1.2,
        "SQS" => 1.2,
        "CloudWatch" => 1.2,
        "QuickSight" => 1.0,
        "DirectConnect" => 1.0,
        "TransitGateway" => 1.0,
        "AppSync" => 0.8,
        "WAF" => 0.5,
        "GuardDuty" => 0.3,
        "Macie" => 0.2,
        "VPC" => 0.1,
        "IAM" => 0.05,
        "CostExplorer" => 0.05,
        _ => return None,
    };
    Some(multiplier)
}

/// Regions a service is billed in.
pub fn regions(service: &str) -> Option<&'static [&'static str]> {
    let regions: &[&str] = match service {
        "EC2" | "S3" | "EKS" | "ECS" => &["us-east-1", "us-west-2", "eu-west-1"],
        "CloudFront" | "IAM" | "CostExplorer" => &["us-east-1"],
        "Lambda" | "RDS" | "DynamoDB" | "Redshift" | "Aurora" | "ElastiCache" | "SageMaker"
        | "Glue" | "Athena" | "Kinesis" | "WAF" | "GuardDuty" | "Macie" | "StepFunctions"
        | "SNS" | "SQS" | "CloudWatch" | "Bedrock" | "EMR" | "FSx" | "Backup" | "AppSync"
        | "QuickSight" | "DirectConnect" | "TransitGateway" | "VPC" => {
            &["us-east-1", "us-west-2"]
        }
        _ => return None,
    };
    Some(regions)
}

/// Usage-type vocabulary per service.
pub fn usage_types(service: &str) -> Option<&'static [&'static str]> {
    let usage_types: &[&str] = match service {
        "EC2" => &["BoxUsage", "CPUCredits"],
        "S3" => &["TimedStorage-ByteHrs", "Requests-Tier1"],
        "Lambda" => &["Duration", "Requests"],
        "RDS" => &["InstanceUsage", "Storage"],
        "DynamoDB" => &["ReadCapacityUnit", "WriteCapacityUnit"],
        "Redshift" => &["NodeUsage", "BackupStorage"],
        "CloudFront" => &["Requests", "DataTransfer-Out-Bytes"],
        "EKS" => &["ClusterHours", "FargatePodSeconds"],
        "ECS" => &["ClusterHours", "TaskHours"],
        "Aurora" => &["InstanceUsage", "IORequests"],
        "ElastiCache" => &["NodeUsage", "BackupStorage"],
        "SageMaker" => &["MLComputeTime", "InferenceRequests"],
        "Glue" => &["DPU-Hours", "CrawledObjects"],
        "Athena" => &["Query", "DataScannedInBytes"],
        "Kinesis" => &["PUTPayloadUnits", "GetRecords"],
        "WAF" => &["WebACLUsage", "RuleEvaluations"],
        "GuardDuty" => &["Finding", "AnalyzedBytes"],
        "Macie" => &["ClassificationJobs", "AnalyzedBytes"],
        "StepFunctions" => &["StateTransitions", "ExecutionTime"],
        "SNS" => &["Notification", "PublishRequests"],
        "SQS" => &["Request", "MessageTransfer"],
        "CloudWatch" => &["Metrics", "LogsIngested"],
        "Bedrock" => &["Inference", "Training"],
        "EMR" => &["InstanceHours", "Storage"],
        "FSx" => &["Storage", "ThroughputCapacity"],
        "Backup" => &["BackupStorage", "RestoreRequests"],
        "AppSync" => &["Query", "Mutation"],
        "QuickSight" => &["Session", "SPICECapacity"],
        "DirectConnect" => &["ConnectionHours", "DataTransfer"],
        "TransitGateway" => &["AttachmentHours", "DataTransfer"],
        "VPC" => &["VPCPeering", "NATGatewayHours"],
        "IAM" => &["APIRequest", "UserCount"],
        "CostExplorer" => &["APIRequest", "ReportGeneration"],
        _ => return None,
    };
    Some(usage_types)
}

/// Service-shaped resource identifier, e.g. `i-0a1b…` for EC2.
pub fn resource_id(service: &str, rng: &mut dyn RngCore) -> Option<String> {
    let id = match service {
        "EC2" => format!("i-{:012x}", rng.random::<u64>() & 0xffff_ffff_ffff),
        "S3" => format!("bucket-{}", rng.random_range(1000..=9999)),
        "Lambda" => format!("lambda-func-{}", rng.random_range(10000..=99999)),
        "RDS" => format!("db-{:012x}", rng.random::<u64>() & 0xffff_ffff_ffff),
        "DynamoDB" => format!("table-{}", rng.random_range(1000..=9999)),
        "Redshift" => format!("cluster-{}", rng.random_range(1000..=9999)),
        "CloudFront" => format!("E{:08X}", rng.random::<u32>()),
        "EKS" => format!("eks-cluster-{}", rng.random_range(1000..=9999)),
        "ECS" => format!("ecs-cluster-{}", rng.random_range(1000..=9999)),
        "Aurora" => format!("aurora-db-{}", rng.random_range(1000..=9999)),
        "ElastiCache" => format!("cache-cluster-{}", rng.random_range(1000..=9999)),
        "SageMaker" => format!("sagemaker-job-{}", rng.random_range(1000..=9999)),
        "Glue" => format!("glue-job-{}", rng.random_range(1000..=9999)),
        "Athena" => format!("athena-query-{}", rng.random_range(100000..=999999)),
        "Kinesis" => format!("kinesis-stream-{}", rng.random_range(1000..=9999)),
        "WAF" => format!("waf-{}", rng.random_range(1000..=9999)),
        "GuardDuty" => format!("gd-detector-{}", rng.random_range(1000..=9999)),
        "Macie" => format!("macie-session-{}", rng.random_range(1000..=9999)),
        "StepFunctions" => format!("stepfn-{}", rng.random_range(1000..=9999)),
        "SNS" => format!("sns-topic-{}", rng.random_range(1000..=9999)),
        "SQS" => format!("sqs-queue-{}", rng.random_range(1000..=9999)),
        "CloudWatch" => format!("cw-alarm-{}", rng.random_range(1000..=9999)),
        "Bedrock" => format!("bedrock-model-{}", rng.random_range(1000..=9999)),
        "EMR" => format!("j-{}", rng.random_range(100000..=999999)),
        "FSx" => format!("fsx-{}", rng.random_range(1000..=9999)),
        "Backup" => format!("backup-vault-{}", rng.random_range(1000..=9999)),
        "AppSync" => format!("appsync-api-{}", rng.random_range(1000..=9999)),
        "QuickSight" => format!("qs-dashboard-{}", rng.random_range(1000..=9999)),
        "DirectConnect" => format!("dxcon-{}", rng.random_range(1000..=9999)),
        "TransitGateway" => format!("tgw-{}", rng.random_range(1000..=9999)),
        "VPC" => format!("vpc-{}", rng.random_range(1000..=9999)),
        "IAM" => format!("iam-role-{}", rng.random_range(1000..=9999)),
        "CostExplorer" => format!("ce-report-{}", rng.random_range(1000..=9999)),
        _ => return None,
    };
    Some(id)
}

/// Billing rate for a (service, usage-type) pair. Monthly storage rates are
/// expressed per hour (÷730). Unmapped pairs fall back to [`DEFAULT_RATE`].
pub fn rate(service: &str, usage_type: &str) -> f64 {
    match (service, usage_type) {
        ("EC2", "BoxUsage") => 0.12,
        ("EC2", "CPUCredits") => 0.09,
        ("S3", "TimedStorage-ByteHrs") => 0.023 / 730.0,
        ("S3", "Requests-Tier1") => 0.0004,
        ("Lambda", "Duration") => 0.00001667,
        ("Lambda", "Requests") => 0.0000002,
        ("RDS", "InstanceUsage") => 0.25,
        ("RDS", "Storage") => 0.10 / 730.0,
        ("DynamoDB", "ReadCapacityUnit") => 0.00013,
        ("DynamoDB", "WriteCapacityUnit") => 0.00065,
        ("Redshift", "NodeUsage") => 0.25,
        ("Redshift", "BackupStorage") => 0.024 / 730.0,
        ("CloudFront", "Requests") => 0.000001,
        ("CloudFront", "DataTransfer-Out-Bytes") => 0.00008,
        ("EKS", "ClusterHours") => 0.10,
        ("EKS", "FargatePodSeconds") => 0.000011244,
        ("ECS", "ClusterHours") => 0.09,
        ("ECS", "TaskHours") => 0.05,
        ("Aurora", "InstanceUsage") => 0.30,
        ("Aurora", "IORequests") => 0.0002,
        ("ElastiCache", "NodeUsage") => 0.20,
        ("ElastiCache", "BackupStorage") => 0.025 / 730.0,
        ("SageMaker", "MLComputeTime") => 0.42,
        ("SageMaker", "InferenceRequests") => 0.0002,
        ("Glue", "DPU-Hours") => 0.44,
        ("Glue", "CrawledObjects") => 0.0001,
        ("Athena", "Query") => 0.002,
        ("Athena", "DataScannedInBytes") => 0.000000005,
        ("Kinesis", "PUTPayloadUnits") => 0.014,
        ("Kinesis", "GetRecords") => 0.0000004,
        ("WAF", "WebACLUsage") => 0.60,
        ("WAF", "RuleEvaluations") => 0.000001,
        ("GuardDuty", "Finding") => 0.80,
        ("GuardDuty", "AnalyzedBytes") => 0.000000001,
        ("Macie", "ClassificationJobs") => 1.25,
        ("Macie", "AnalyzedBytes") => 0.000000001,
        ("StepFunctions", "StateTransitions") => 0.000025,
        ("StepFunctions", "ExecutionTime") => 0.00001667,
        ("SNS", "Notification") => 0.0000005,
        ("SNS", "PublishRequests") => 0.0000005,
        ("SQS", "Request") => 0.0000004,
        ("SQS", "MessageTransfer") => 0.0000002,
        ("CloudWatch", "Metrics") => 0.30,
        ("CloudWatch", "LogsIngested") => 0.0000005,
        ("Bedrock", "Inference") => 0.002,
        ("Bedrock", "Training") => 0.01,
        ("EMR", "InstanceHours") => 0.27,
        ("EMR", "Storage") => 0.025 / 730.0,
        ("FSx", "Storage") => 0.13 / 730.0,
        ("FSx", "ThroughputCapacity") => 0.05,
        ("Backup", "BackupStorage") => 0.05 / 730.0,
        ("Backup", "RestoreRequests") => 0.0005,
        ("AppSync", "Query") => 0.0004,
        ("AppSync", "Mutation") => 0.0004,
        ("QuickSight", "Session") => 0.30,
        ("QuickSight", "SPICECapacity") => 0.25,
        ("DirectConnect", "ConnectionHours") => 0.08,
        ("DirectConnect", "DataTransfer") => 0.00002,
        ("TransitGateway", "AttachmentHours") => 0.06,
        ("TransitGateway", "DataTransfer") => 0.00002,
        ("VPC", "VPCPeering") => 0.01,
        ("VPC", "NATGatewayHours") => 0.045,
        ("IAM", "APIRequest") => 0.000001,
        ("IAM", "UserCount") => 0.0,
        ("CostExplorer", "APIRequest") => 0.00001,
        ("CostExplorer", "ReportGeneration") => 0.0001,
        _ => DEFAULT_RATE,
    }
}
