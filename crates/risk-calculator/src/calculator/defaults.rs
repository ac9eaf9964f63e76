use super::domain::{
    Criterion, CriterionId, CriterionOption, OptionId, PlatformType, PlatformTypeId,
};

/// Criterion that leads every platform type's questionnaire when present.
pub const INTERNAL_ALTERNATIVE_CRITERION: &str = "Internal Alternative Exists?";

#[derive(Debug)]
struct PlatformTemplate {
    name: &'static str,
    description: &'static str,
    criteria: Vec<CriterionTemplate>,
}

#[derive(Debug)]
struct CriterionTemplate {
    name: &'static str,
    description: &'static str,
    weight: f64,
    options: Vec<OptionTemplate>,
}

#[derive(Debug)]
struct OptionTemplate {
    label: &'static str,
    value: f64,
    description: &'static str,
}

impl OptionTemplate {
    const fn new(label: &'static str, value: f64, description: &'static str) -> Self {
        Self {
            label,
            value,
            description,
        }
    }
}

/// Built-in catalog used to seed the store when nothing has been persisted yet.
/// Every call generates fresh identifiers.
pub fn default_platform_types() -> Vec<PlatformType> {
    standard_templates()
        .into_iter()
        .map(PlatformTemplate::instantiate)
        .map(move_internal_alternative_first)
        .collect()
}

impl PlatformTemplate {
    fn instantiate(self) -> PlatformType {
        PlatformType {
            id: PlatformTypeId::generate(),
            name: self.name.to_string(),
            description: self.description.to_string(),
            criteria: self
                .criteria
                .into_iter()
                .map(|criterion| Criterion {
                    id: CriterionId::generate(),
                    name: criterion.name.to_string(),
                    description: criterion.description.to_string(),
                    weight: criterion.weight,
                    options: criterion
                        .options
                        .into_iter()
                        .map(|option| CriterionOption {
                            id: OptionId::generate(),
                            label: option.label.to_string(),
                            value: option.value,
                            description: Some(option.description.to_string()),
                        })
                        .collect(),
                    gate: None,
                })
                .collect(),
        }
    }
}

fn move_internal_alternative_first(mut platform_type: PlatformType) -> PlatformType {
    if let Some(index) = platform_type
        .criteria
        .iter()
        .position(|criterion| criterion.name == INTERNAL_ALTERNATIVE_CRITERION)
    {
        let criterion = platform_type.criteria.remove(index);
        platform_type.criteria.insert(0, criterion);
    }
    platform_type
}

fn standard_templates() -> Vec<PlatformTemplate> {
    vec![
        PlatformTemplate {
            name: "SaaS",
            description: "Software as a Service applications",
            criteria: vec![
                CriterionTemplate {
                    name: "Internal Alternative Exists?",
                    description: "Assesses whether there is an existing internal solution, system, or capability that could meet the same business need as the requested external application. Having internal alternatives reduces dependency on external vendors, improves security control, and may provide cost benefits. Consider existing systems, in-house development capabilities, and alternative approaches to meeting the business requirement.",
                    weight: 7.0,
                    options: vec![
                        OptionTemplate::new("Yes, internal alternative available", 0.0, "Existing internal solution can meet the business need - external app not justified"),
                        OptionTemplate::new("No internal alternative available", 100.0, "No existing or feasible internal solution - external app is necessary"),
                    ],
                },
                CriterionTemplate {
                    name: "Fits Business Strategy?",
                    description: "Evaluates how well this application aligns with the organization's strategic objectives, digital transformation goals, and business priorities. Consider whether the application supports core business functions, enhances productivity, or enables new capabilities that are essential to business success. Applications that directly support strategic initiatives pose lower risk and provide higher value.",
                    weight: 9.0,
                    options: vec![
                        OptionTemplate::new("Fully aligned", 100.0, "Directly supports core strategic objectives and business priorities"),
                        OptionTemplate::new("No alignment", 0.0, "Does not support any identified business strategy or objectives"),
                    ],
                },
                CriterionTemplate {
                    name: "Vendor on approved list?",
                    description: "Assesses whether the vendor has undergone proper due diligence and security assessment by the organization. Approved vendors have been vetted for financial stability, security practices, compliance standards, and contractual terms. Using approved vendors reduces procurement risk and ensures established support channels.",
                    weight: 7.0,
                    options: vec![
                        OptionTemplate::new("Yes, fully approved", 100.0, "Vendor has completed full approval process and security assessment"),
                        OptionTemplate::new("Not approved", 0.0, "Vendor has not been assessed or has failed approval process"),
                    ],
                },
                CriterionTemplate {
                    name: "Already marked as Sanctioned by?",
                    description: "Determines the level of organizational approval and oversight for this application. Administrator-level sanctions indicate thorough security review and ongoing governance with elevated privileges, while general user sanctions provide basic approval but with limited oversight.",
                    weight: 5.0,
                    options: vec![
                        OptionTemplate::new("Administrator", 100.0, "Formally approved by administrator with elevated privileges and security controls validated"),
                        OptionTemplate::new("Non-administrator/General user", 0.0, "Approved by general user without administrative oversight or elevated security review"),
                    ],
                },
                CriterionTemplate {
                    name: "Status",
                    description: "Evaluates the approval and monitoring status of the application within the organization. Sanctioned applications have formal approval and security clearance, monitored applications are under active oversight, custom applications are internally developed, while unsanctioned applications pose significant security and compliance risks.",
                    weight: 4.0,
                    options: vec![
                        OptionTemplate::new("Sanctioned", 100.0, "Formally approved and sanctioned for organizational use with security clearance"),
                        OptionTemplate::new("Monitored", 70.0, "Under active monitoring and oversight with conditional approval"),
                        OptionTemplate::new("Custom app", 50.0, "Internally developed or customized application with known security controls"),
                        OptionTemplate::new("Unsanctioned", 0.0, "Not formally approved and poses significant security and compliance risks"),
                    ],
                },
                CriterionTemplate {
                    name: "Risk score",
                    description: "Overall risk assessment considering factors such as data sensitivity, business impact, technical complexity, and potential for security incidents. This score should reflect the comprehensive risk analysis performed by the security team, considering both likelihood and impact of potential issues.",
                    weight: 14.0,
                    options: vec![
                        OptionTemplate::new("Low risk (1-3)", 100.0, "Minimal risk to organization with strong controls and low impact"),
                        OptionTemplate::new("Medium risk (4-6)", 65.0, "Moderate risk requiring additional controls and monitoring"),
                        OptionTemplate::new("High risk (7-8)", 35.0, "Significant risk requiring extensive controls and executive approval"),
                        OptionTemplate::new("Critical risk (9-10)", 0.0, "Unacceptable risk level that could severely impact the organization"),
                    ],
                },
                CriterionTemplate {
                    name: "Security risk factor",
                    description: "Specific assessment of cybersecurity risks including data protection, access controls, encryption, vulnerability management, and incident response capabilities. Consider the application's security architecture, the vendor's security practices, and potential attack vectors.",
                    weight: 14.0,
                    options: vec![
                        OptionTemplate::new("Low security risk", 100.0, "Strong security controls, encryption, and proven security track record"),
                        OptionTemplate::new("Medium security risk", 65.0, "Adequate security controls with some areas for improvement"),
                        OptionTemplate::new("High security risk", 35.0, "Significant security concerns requiring additional protective measures"),
                        OptionTemplate::new("Critical security risk", 0.0, "Severe security vulnerabilities or inadequate security practices"),
                    ],
                },
                CriterionTemplate {
                    name: "Compliance risk factor",
                    description: "Assessment of regulatory and policy compliance including GDPR, industry standards, organizational policies, and audit requirements. Consider data handling practices, retention policies, access logging, and the vendor's compliance certifications and track record.",
                    weight: 9.0,
                    options: vec![
                        OptionTemplate::new("Fully compliant", 100.0, "Meets all applicable regulations and organizational policies"),
                        OptionTemplate::new("Minor compliance gaps", 70.0, "Small compliance issues that can be addressed with controls"),
                        OptionTemplate::new("Major compliance issues", 30.0, "Significant compliance concerns requiring substantial remediation"),
                        OptionTemplate::new("Non-compliant", 0.0, "Fails to meet critical regulatory or policy requirements"),
                    ],
                },
                CriterionTemplate {
                    name: "Legal score",
                    description: "Evaluation of legal risks including contract terms, liability provisions, data processing agreements, intellectual property concerns, and jurisdictional issues. Consider the vendor's legal standing, contract negotiability, and potential legal exposure for the organization.",
                    weight: 7.0,
                    options: vec![
                        OptionTemplate::new("Low legal risk", 100.0, "Favorable contract terms with appropriate liability protections"),
                        OptionTemplate::new("Medium legal risk", 65.0, "Standard contract terms with manageable legal exposure"),
                        OptionTemplate::new("High legal risk", 25.0, "Concerning contract terms or significant legal exposure"),
                        OptionTemplate::new("Critical legal risk", 0.0, "Unacceptable legal terms or severe legal exposure"),
                    ],
                },
                CriterionTemplate {
                    name: "App last authorised date",
                    description: "Indicates how recently the application has undergone security review and authorization. Regular reauthorization ensures that security controls remain current and that any changes to the application or threat landscape are properly assessed.",
                    weight: 5.0,
                    options: vec![
                        OptionTemplate::new("Within last 6 months", 100.0, "Recent authorization with current security assessment"),
                        OptionTemplate::new("6-12 months ago", 80.0, "Relatively recent authorization, may need review update"),
                        OptionTemplate::new("1-2 years ago", 40.0, "Outdated authorization requiring comprehensive review"),
                        OptionTemplate::new("Over 2 years or never", 0.0, "No recent authorization or never formally authorized"),
                    ],
                },
                CriterionTemplate {
                    name: "App Supplier Domain/URL",
                    description: "Evaluates the legitimacy and security of the vendor's web presence. Verified domains with proper security certificates indicate a professional, security-conscious vendor. Suspicious or unverified domains may indicate fraudulent or insecure services.",
                    weight: 4.0,
                    options: vec![
                        OptionTemplate::new("Verified secure domain", 100.0, "Legitimate domain with valid SSL certificate and security headers"),
                        OptionTemplate::new("Known domain, HTTPS", 75.0, "Recognized domain with basic HTTPS security"),
                        OptionTemplate::new("Unknown domain", 25.0, "Unfamiliar domain requiring additional verification"),
                        OptionTemplate::new("Suspicious/insecure domain", 0.0, "Domain appears fraudulent or lacks basic security measures"),
                    ],
                },
                CriterionTemplate {
                    name: "Login URL",
                    description: "Assesses the security of the authentication endpoint. Secure login URLs with valid certificates protect user credentials during authentication. Insecure login pages expose credentials to interception and compromise.",
                    weight: 3.0,
                    options: vec![
                        OptionTemplate::new("HTTPS with valid certificate", 100.0, "Secure login with proper SSL/TLS encryption and valid certificate"),
                        OptionTemplate::new("HTTPS with minor issues", 65.0, "Encrypted login with minor certificate or configuration issues"),
                        OptionTemplate::new("HTTP or certificate issues", 35.0, "Unencrypted login or significant certificate problems"),
                        OptionTemplate::new("Insecure or suspicious", 0.0, "Clearly insecure login or suspicious authentication mechanism"),
                    ],
                },
                CriterionTemplate {
                    name: "Is AI or similar?",
                    description: "Identifies applications using artificial intelligence, machine learning, or automated decision-making technologies. AI applications may pose additional risks related to data processing, algorithmic bias, transparency, and regulatory compliance (e.g., EU AI Act).",
                    weight: 4.0,
                    options: vec![
                        OptionTemplate::new("No AI/ML functionality", 100.0, "Traditional application without AI or machine learning components"),
                        OptionTemplate::new("Basic AI with transparency", 80.0, "Limited AI use with clear documentation and explainability"),
                        OptionTemplate::new("Advanced AI with controls", 40.0, "Significant AI functionality with appropriate governance controls"),
                        OptionTemplate::new("AI/ML with unknown risks", 0.0, "AI functionality without adequate transparency or risk assessment"),
                    ],
                },
                CriterionTemplate {
                    name: "Data Center location",
                    description: "Critical for data sovereignty and regulatory compliance. Data location affects legal jurisdiction, government access rights, privacy protections, and compliance with regulations like GDPR. UK and EU locations generally provide stronger privacy protections for UK organizations.",
                    weight: 8.0,
                    options: vec![
                        OptionTemplate::new("UK", 100.0, "Data stored exclusively in UK data centers under UK jurisdiction"),
                        OptionTemplate::new("EU/EEA", 80.0, "Data stored in European Union or European Economic Area"),
                        OptionTemplate::new("Non-UK, non-EU/EEA", 0.0, "Data stored in countries outside UK and EU/EEA with potentially weaker privacy protections"),
                    ],
                },
            ],
        },
        PlatformTemplate {
            name: "Locally Installed",
            description: "Applications installed on local devices",
            criteria: vec![
                CriterionTemplate {
                    name: "Internal Alternative Exists?",
                    description: "Assesses whether there is an existing internal solution, system, or capability that could meet the same business need as the requested external application. Having internal alternatives reduces dependency on external vendors, improves security control, and may provide cost benefits. Consider existing systems, in-house development capabilities, and alternative approaches to meeting the business requirement.",
                    weight: 20.0,
                    options: vec![
                        OptionTemplate::new("Yes, internal alternative available", 0.0, "Existing internal solution can meet the business need - external app not justified"),
                        OptionTemplate::new("No internal alternative available", 100.0, "No existing or feasible internal solution - external app is necessary"),
                    ],
                },
                CriterionTemplate {
                    name: "Vendor Reputation",
                    description: "Assesses the trustworthiness and track record of the software vendor. Well-established vendors typically have better security practices, regular updates, and reliable support. Unknown vendors may pose higher risks due to unproven security practices or potential malicious intent.",
                    weight: 20.0,
                    options: vec![
                        OptionTemplate::new("Well-established", 100.0, "Recognized vendor with strong reputation and proven track record"),
                        OptionTemplate::new("Known", 60.0, "Familiar vendor with adequate reputation but limited track record"),
                        OptionTemplate::new("Unknown", 0.0, "Unfamiliar vendor with no established reputation or track record"),
                    ],
                },
                CriterionTemplate {
                    name: "Installation Privileges",
                    description: "Evaluates the level of system access required for installation. Applications requiring administrative privileges have greater potential to compromise system security, install malware, or access sensitive data. Standard user installations pose significantly lower risk.",
                    weight: 20.0,
                    options: vec![
                        OptionTemplate::new("Standard user", 100.0, "Can be installed with standard user privileges without admin access"),
                        OptionTemplate::new("Admin required", 40.0, "Requires administrative privileges for installation or operation"),
                    ],
                },
                CriterionTemplate {
                    name: "Security Scan",
                    description: "Indicates whether the application has been analyzed for malware, vulnerabilities, and security issues using automated scanning tools or manual security assessment. Clean scans provide confidence in the application's security posture.",
                    weight: 20.0,
                    options: vec![
                        OptionTemplate::new("Yes, clean", 100.0, "Comprehensive security scan completed with no issues identified"),
                        OptionTemplate::new("Yes, minor issues", 60.0, "Security scan completed with minor, manageable issues identified"),
                        OptionTemplate::new("Yes, major issues", 20.0, "Security scan revealed significant security concerns"),
                        OptionTemplate::new("No", 0.0, "No security scanning has been performed"),
                    ],
                },
                CriterionTemplate {
                    name: "Business Need",
                    description: "Assesses the importance and urgency of the business requirement that this application addresses. Critical business needs may justify accepting higher risks, while applications without clear business value should be rejected regardless of security posture.",
                    weight: 20.0,
                    options: vec![
                        OptionTemplate::new("Yes, critical", 100.0, "Essential for critical business operations or regulatory compliance"),
                        OptionTemplate::new("Yes, important", 80.0, "Supports important business functions or significant productivity gains"),
                        OptionTemplate::new("Yes, useful", 60.0, "Provides useful functionality but not essential for operations"),
                        OptionTemplate::new("No", 0.0, "No clear business justification or need identified"),
                    ],
                },
            ],
        },
        PlatformTemplate {
            name: "OAuth",
            description: "Applications using OAuth for authorization",
            criteria: vec![
                CriterionTemplate {
                    name: "Internal Alternative Exists?",
                    description: "Assesses whether there is an existing internal solution, system, or capability that could meet the same business need as the requested external application. Having internal alternatives reduces dependency on external vendors, improves security control, and may provide cost benefits. Consider existing systems, in-house development capabilities, and alternative approaches to meeting the business requirement.",
                    weight: 20.0,
                    options: vec![
                        OptionTemplate::new("Yes, internal alternative available", 0.0, "Existing internal solution can meet the business need - external app not justified"),
                        OptionTemplate::new("No internal alternative available", 100.0, "No existing or feasible internal solution - external app is necessary"),
                    ],
                },
                CriterionTemplate {
                    name: "Permissions Scope",
                    description: "Evaluates the extent of access permissions requested by the application. Read-only access poses minimal risk, while full access permissions could allow the application to modify or delete critical data. The principle of least privilege should guide permission grants.",
                    weight: 24.0,
                    options: vec![
                        OptionTemplate::new("Read-only", 100.0, "Application requests only read access to data"),
                        OptionTemplate::new("Limited write", 65.0, "Application requests limited write permissions to specific data types"),
                        OptionTemplate::new("Full access", 0.0, "Application requests comprehensive read and write access to all data"),
                    ],
                },
                CriterionTemplate {
                    name: "App Verification",
                    description: "Indicates whether the application has been verified by the OAuth provider (e.g., Google, Microsoft). Verified applications have undergone security review and identity verification by the platform provider, reducing the risk of malicious applications.",
                    weight: 20.0,
                    options: vec![
                        OptionTemplate::new("Yes", 100.0, "Application has been verified by the OAuth provider"),
                        OptionTemplate::new("No", 0.0, "Application has not undergone provider verification process"),
                    ],
                },
                CriterionTemplate {
                    name: "User Base",
                    description: "Assesses the scope of potential impact based on the number of users who will use the application. Single-user applications limit exposure, while organization-wide deployments could affect all users if the application is compromised.",
                    weight: 16.0,
                    options: vec![
                        OptionTemplate::new("Single user", 100.0, "Application will be used by only one individual"),
                        OptionTemplate::new("Department", 50.0, "Application will be used by a specific department or team"),
                        OptionTemplate::new("Organization-wide", 25.0, "Application will be deployed across the entire organization"),
                    ],
                },
                CriterionTemplate {
                    name: "Data Access",
                    description: "Evaluates the sensitivity level of data that the application will access. Public data poses minimal risk, while access to restricted or confidential data could result in significant data breaches if the application is compromised.",
                    weight: 20.0,
                    options: vec![
                        OptionTemplate::new("Public only", 100.0, "Application accesses only publicly available information"),
                        OptionTemplate::new("Internal", 60.0, "Application accesses internal business data not publicly available"),
                        OptionTemplate::new("Confidential", 20.0, "Application accesses confidential or sensitive business data"),
                        OptionTemplate::new("Restricted", 0.0, "Application accesses highly restricted or regulated data"),
                    ],
                },
            ],
        },
        PlatformTemplate {
            name: "Plugins",
            description: "Browser extensions, IDE plugins, and application add-ons",
            criteria: vec![
                CriterionTemplate {
                    name: "Internal Alternative Exists?",
                    description: "Assesses whether there is an existing internal solution, system, or capability that could meet the same business need as the requested external application. Having internal alternatives reduces dependency on external vendors, improves security control, and may provide cost benefits. Consider existing systems, in-house development capabilities, and alternative approaches to meeting the business requirement.",
                    weight: 12.0,
                    options: vec![
                        OptionTemplate::new("Yes, internal alternative available", 0.0, "Existing internal solution can meet the business need - external app not justified"),
                        OptionTemplate::new("No internal alternative available", 100.0, "No existing or feasible internal solution - external app is necessary"),
                    ],
                },
                CriterionTemplate {
                    name: "Permissions Requested",
                    description: "Evaluates the scope and sensitivity of permissions requested by the plugin. Plugins with minimal permissions pose lower risk, while those requesting broad access to data, network, or system resources require careful evaluation. Follow the principle of least privilege.",
                    weight: 26.0,
                    options: vec![
                        OptionTemplate::new("Minimal permissions", 100.0, "Plugin requests only essential permissions for basic functionality"),
                        OptionTemplate::new("Standard permissions", 75.0, "Plugin requests typical permissions for its category and functionality"),
                        OptionTemplate::new("Elevated permissions", 40.0, "Plugin requests broad permissions including network access or data modification"),
                        OptionTemplate::new("Excessive permissions", 0.0, "Plugin requests unnecessary or overly broad permissions that exceed functional needs"),
                    ],
                },
                CriterionTemplate {
                    name: "Developer Reputation",
                    description: "Assesses the trustworthiness and track record of the plugin developer or organization. Established developers with good reputations and multiple quality plugins pose lower risk than unknown or new developers with limited history.",
                    weight: 13.0,
                    options: vec![
                        OptionTemplate::new("Well-known developer", 100.0, "Recognized developer or organization with strong reputation and track record"),
                        OptionTemplate::new("Established developer", 80.0, "Developer with good reputation and several published plugins"),
                        OptionTemplate::new("New/unknown developer", 40.0, "Developer with limited history or unknown reputation"),
                        OptionTemplate::new("Suspicious developer", 0.0, "Developer with concerning history or suspicious characteristics"),
                    ],
                },
                CriterionTemplate {
                    name: "Data Access Level",
                    description: "Evaluates what type of data the plugin can access and process. Plugins accessing sensitive business data, personal information, or system credentials pose higher risks than those working with public or non-sensitive data.",
                    weight: 22.0,
                    options: vec![
                        OptionTemplate::new("No data access", 100.0, "Plugin operates without accessing user or system data"),
                        OptionTemplate::new("Public data only", 85.0, "Plugin accesses only publicly available information"),
                        OptionTemplate::new("Internal data", 50.0, "Plugin accesses internal business data or user information"),
                        OptionTemplate::new("Sensitive/credential data", 0.0, "Plugin accesses sensitive data, credentials, or highly confidential information"),
                    ],
                },
                CriterionTemplate {
                    name: "Update Frequency",
                    description: "Assesses how regularly the plugin is maintained and updated. Regular updates indicate active maintenance, security patching, and ongoing support. Abandoned or rarely updated plugins may contain unpatched vulnerabilities.",
                    weight: 9.0,
                    options: vec![
                        OptionTemplate::new("Regular updates (monthly)", 100.0, "Plugin is actively maintained with regular updates and security patches"),
                        OptionTemplate::new("Periodic updates (quarterly)", 80.0, "Plugin receives periodic updates and maintenance"),
                        OptionTemplate::new("Infrequent updates (yearly)", 40.0, "Plugin is updated infrequently, may have delayed security patches"),
                        OptionTemplate::new("No recent updates", 0.0, "Plugin appears abandoned with no recent updates or maintenance"),
                    ],
                },
                CriterionTemplate {
                    name: "Business Justification",
                    description: "Evaluates the business need and value provided by the plugin. Strong business justification may warrant accepting higher risks, while plugins without clear business value should be rejected regardless of security posture.",
                    weight: 9.0,
                    options: vec![
                        OptionTemplate::new("Critical business need", 100.0, "Plugin is essential for critical business operations or compliance requirements"),
                        OptionTemplate::new("Important productivity gain", 80.0, "Plugin provides significant productivity improvements or workflow enhancements"),
                        OptionTemplate::new("Useful but not essential", 60.0, "Plugin offers useful functionality but is not critical for operations"),
                        OptionTemplate::new("No clear business value", 0.0, "Plugin provides no clear business benefit or justification"),
                    ],
                },
                CriterionTemplate {
                    name: "App Source and Publisher Verification",
                    description: "Comprehensive verification of the app publisher's identity and reputation. This includes checking if the app is from Microsoft AppSource or a trusted third-party developer, reviewing the app's security certifications and compliance attestations, and validating digital signatures and certificates. Proper publisher verification reduces the risk of malicious or compromised plugins.",
                    weight: 9.0,
                    options: vec![
                        OptionTemplate::new("Fully verified publisher", 100.0, "Publisher identity verified, from trusted source (e.g., Microsoft AppSource), with valid certificates and security attestations"),
                        OptionTemplate::new("Verified with minor gaps", 75.0, "Publisher mostly verified but missing some certifications or attestations"),
                        OptionTemplate::new("Partially verified", 40.0, "Some publisher verification completed but significant gaps in identity or security validation"),
                        OptionTemplate::new("Unverified publisher", 0.0, "Publisher identity not verified, no security certifications, or invalid/missing digital signatures"),
                    ],
                },
            ],
        },
        PlatformTemplate {
            name: "Whitelisting websites",
            description: "Requests to whitelist blocked websites and domains",
            criteria: vec![
                CriterionTemplate {
                    name: "Probably misclassified and therefore blocked incorrectly?",
                    description: "Assesses whether the website appears to have been incorrectly categorized or blocked by automated systems. Legitimate business websites may sometimes be misclassified due to content analysis errors, domain reputation issues, or false positives in security scanning. Consider the website's actual content, purpose, and legitimacy versus the stated blocking reason.",
                    weight: 35.0,
                    options: vec![
                        OptionTemplate::new("Yes, clearly misclassified", 100.0, "Website is legitimate and appears to be incorrectly blocked due to classification error"),
                        OptionTemplate::new("Possibly misclassified", 70.0, "Website may be legitimate but classification is unclear or borderline"),
                        OptionTemplate::new("Correctly classified", 0.0, "Website appears to be correctly blocked based on its content or category"),
                    ],
                },
                CriterionTemplate {
                    name: "Was blocked by tool due to security reasons?",
                    description: "Determines if the website was blocked specifically due to security concerns such as malware, phishing, suspicious activity, or known threats. Security-based blocks require careful evaluation as they may indicate genuine risks that could compromise organizational security if the site is whitelisted.",
                    weight: 40.0,
                    options: vec![
                        OptionTemplate::new("No security concerns", 100.0, "Website was not blocked for security reasons - blocked for policy or category reasons only"),
                        OptionTemplate::new("Minor security flags", 60.0, "Website has minor security concerns that may be false positives or low risk"),
                        OptionTemplate::new("Significant security concerns", 20.0, "Website was blocked due to confirmed security threats or suspicious activity"),
                        OptionTemplate::new("Known malicious site", 0.0, "Website is known to host malware, phishing, or other malicious content"),
                    ],
                },
                CriterionTemplate {
                    name: "Has a Business Justification?",
                    description: "Evaluates whether there is a legitimate business need for accessing this website. Strong business justification is essential for whitelisting requests, as it helps balance security risks against operational requirements. Consider the business impact of continued blocking versus the potential security risks of allowing access.",
                    weight: 25.0,
                    options: vec![
                        OptionTemplate::new("Critical business need", 100.0, "Website access is essential for critical business operations, compliance, or customer service"),
                        OptionTemplate::new("Important business need", 80.0, "Website supports important business functions or provides significant operational value"),
                        OptionTemplate::new("Minor business benefit", 40.0, "Website provides some business value but is not essential for operations"),
                        OptionTemplate::new("No clear business justification", 0.0, "No legitimate business reason identified for accessing this website"),
                    ],
                },
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ships_five_platform_types() {
        let names: Vec<String> = default_platform_types()
            .into_iter()
            .map(|platform_type| platform_type.name)
            .collect();
        assert_eq!(
            names,
            vec![
                "SaaS",
                "Locally Installed",
                "OAuth",
                "Plugins",
                "Whitelisting websites"
            ]
        );
    }

    #[test]
    fn default_weights_sum_to_one_hundred() {
        for platform_type in default_platform_types() {
            assert_eq!(
                platform_type.total_weight(),
                100.0,
                "{} weights drifted",
                platform_type.name
            );
        }
    }

    #[test]
    fn oauth_weights_match_reference_configuration() {
        let oauth = default_platform_types()
            .into_iter()
            .find(|platform_type| platform_type.name == "OAuth")
            .expect("oauth present");
        let weights: Vec<f64> = oauth.criteria.iter().map(|criterion| criterion.weight).collect();
        assert_eq!(weights, vec![20.0, 24.0, 20.0, 16.0, 20.0]);
    }

    #[test]
    fn option_values_stay_in_range_and_ids_are_unique() {
        let mut ids = HashSet::new();
        for platform_type in default_platform_types() {
            assert!(ids.insert(platform_type.id.0.clone()));
            for criterion in &platform_type.criteria {
                assert!(ids.insert(criterion.id.0.clone()));
                assert!(!criterion.options.is_empty());
                for option in &criterion.options {
                    assert!(ids.insert(option.id.0.clone()));
                    assert!((0.0..=100.0).contains(&option.value));
                }
            }
        }
    }

    #[test]
    fn internal_alternative_leads_when_present() {
        for platform_type in default_platform_types() {
            if platform_type
                .criterion_named(INTERNAL_ALTERNATIVE_CRITERION)
                .is_some()
            {
                assert_eq!(
                    platform_type.criteria[0].name,
                    INTERNAL_ALTERNATIVE_CRITERION
                );
            }
        }
    }

    #[test]
    fn internal_alternative_is_moved_to_the_front() {
        let mut platform_type = default_platform_types().remove(2);
        platform_type.criteria.rotate_left(2);
        assert_ne!(platform_type.criteria[0].name, INTERNAL_ALTERNATIVE_CRITERION);

        let reordered = move_internal_alternative_first(platform_type);
        assert_eq!(reordered.criteria[0].name, INTERNAL_ALTERNATIVE_CRITERION);
    }
}
