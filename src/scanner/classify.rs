use crate::model::FileRole;

struct RoleRule {
    role: FileRole,
    name_markers: &'static [&'static str],
    content_markers: &'static [&'static str],
}

// First match wins, so order matters: an `OrderJobController.java` is a Controller.
static ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        role: FileRole::Entity,
        name_markers: &["Entity"],
        content_markers: &["@Entity"],
    },
    RoleRule {
        role: FileRole::Controller,
        name_markers: &["Controller"],
        content_markers: &["@Controller", "@RestController"],
    },
    RoleRule {
        role: FileRole::Service,
        name_markers: &["Service"],
        content_markers: &["@Service"],
    },
    RoleRule {
        role: FileRole::Repository,
        name_markers: &["Repository"],
        content_markers: &["@Repository"],
    },
    RoleRule {
        role: FileRole::Dto,
        name_markers: &["DTO", "DataTransferObject"],
        content_markers: &[],
    },
    RoleRule {
        role: FileRole::BatchJob,
        name_markers: &["Job"],
        content_markers: &["@Scheduled"],
    },
    RoleRule {
        role: FileRole::Configuration,
        name_markers: &["Config"],
        content_markers: &["@Configuration"],
    },
    RoleRule {
        role: FileRole::Test,
        name_markers: &["Test"],
        content_markers: &["@Test"],
    },
    RoleRule {
        role: FileRole::MainClass,
        name_markers: &["Main"],
        content_markers: &["public static void main"],
    },
    RoleRule {
        role: FileRole::Exception,
        name_markers: &["Exception"],
        content_markers: &[],
    },
    RoleRule {
        role: FileRole::Utility,
        name_markers: &["Util"],
        content_markers: &[],
    },
];

pub fn classify_file(file_name: &str, content: &str) -> FileRole {
    ROLE_RULES
        .iter()
        .find(|rule| {
            rule.name_markers.iter().any(|marker| file_name.contains(marker))
                || rule.content_markers.iter().any(|marker| content.contains(marker))
        })
        .map(|rule| rule.role)
        .unwrap_or(FileRole::Other)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_by_name_then_content() {
        assert_eq!(classify_file("UserEntity.java", ""), FileRole::Entity);
        assert_eq!(classify_file("User.java", "@Entity\nclass User {}"), FileRole::Entity);
        assert_eq!(classify_file("OrderJobController.java", ""), FileRole::Controller);
        assert_eq!(classify_file("Api.java", "@RestController class Api {}"), FileRole::Controller);
        assert_eq!(classify_file("UserDTO.java", ""), FileRole::Dto);
        assert_eq!(classify_file("Cleanup.java", "@Scheduled(fixedRate = 5)"), FileRole::BatchJob);
        assert_eq!(classify_file("AppConfig.java", ""), FileRole::Configuration);
        assert_eq!(classify_file("Launcher.java", "public static void main(String[] a)"), FileRole::MainClass);
        assert_eq!(classify_file("NotFoundException.java", ""), FileRole::Exception);
        assert_eq!(classify_file("StringUtils.java", ""), FileRole::Utility);
        assert_eq!(classify_file("Money.java", "class Money {}"), FileRole::Other);
    }
}
